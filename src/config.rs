//! Configuration loading
//!
//! Read once at startup from a TOML file, then overridden by environment
//! variables. The resulting [`Config`] is passed by reference to whatever
//! needs it; there is no global.

use crate::error::{Error, Result};
use crate::repo::{DEFAULT_TIMEOUT_SECS, RepoSetup};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Directory under the user config dir holding `config.toml`
const CONFIG_DIR: &str = "backporter";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

/// Default `group/project` path on GitLab
const DEFAULT_PROJECT: &str = "px/platform";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Local repository and committer settings
    pub git: GitConfig,
    /// GitLab API settings
    pub gitlab: GitLabConfig,
    /// Jira API settings
    pub jira: JiraConfig,
}

/// Local repository and committer settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    /// Committer name, also the default MR assignee
    pub username: String,
    /// Committer email
    pub email: String,
    /// MR assignee (defaults to `username`)
    pub assignee: Option<String>,
    /// MR reviewer
    pub reviewer: Option<String>,
    /// Repository root every git command runs in
    pub root: Option<PathBuf>,
    /// Per-command timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            assignee: None,
            reviewer: None,
            root: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// GitLab API settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitLabConfig {
    /// v4 API root, e.g. `https://gitlab.example.com/api/v4`
    pub api_url: String,
    /// Personal access token (API and push)
    pub token: String,
    /// `group/project` path MRs are opened in
    pub project: String,
    /// HTTPS push remote of the project
    pub remote_url: String,
    /// Skip TLS certificate verification (self-signed hosts)
    pub accept_invalid_certs: bool,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            token: String::new(),
            project: DEFAULT_PROJECT.to_string(),
            remote_url: String::new(),
            accept_invalid_certs: false,
        }
    }
}

/// Jira API settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JiraConfig {
    /// REST root, e.g. `https://acme.atlassian.net/rest/api/2`
    pub api_url: String,
    /// Account email for basic auth
    pub email: String,
    /// API token for basic auth
    pub token: String,
}

/// Default config file location (`<config_dir>/backporter/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn set(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl Config {
    /// Load configuration from `path` (or the default location), apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.is_file() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parse TOML config text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Override values from environment variables.
    ///
    /// `lookup` returns the value of a variable, if set. Empty values are
    /// ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        set(&mut self.git.username, var("GIT_USERNAME"));
        set(&mut self.git.email, var("GIT_EMAIL"));
        if let Some(v) = var("GIT_MR_ASSIGNEE_NAME") {
            self.git.assignee = Some(v);
        }
        if let Some(v) = var("GIT_MR_REVIEWER_NAME") {
            self.git.reviewer = Some(v);
        }
        if let Some(v) = var("GIT_PATH_TO_ROOT_FOLDER") {
            self.git.root = Some(PathBuf::from(v));
        }
        if let Some(v) = var("COMMAND_TIMEOUT_SECS") {
            self.git.timeout_secs = v
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("COMMAND_TIMEOUT_SECS '{v}': {e}")))?;
        }

        set(&mut self.gitlab.api_url, var("GITLAB_API_URL"));
        set(&mut self.gitlab.token, var("PERSONAL_TOKEN"));
        set(&mut self.gitlab.project, var("GITLAB_PROJECT"));
        set(&mut self.gitlab.remote_url, var("GIT_REMOTE_URL"));

        set(&mut self.jira.api_url, var("JIRA_API_URL"));
        set(&mut self.jira.email, var("JIRA_EMAIL"));
        set(&mut self.jira.token, var("JIRA_TOKEN"));
        Ok(())
    }

    /// Check that every required setting is present, naming all missing ones,
    /// and that the command timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.git.timeout_secs == 0 {
            return Err(Error::Config(
                "git.timeout_secs (COMMAND_TIMEOUT_SECS) must be at least 1".to_string(),
            ));
        }

        let required = [
            ("git.username (GIT_USERNAME)", self.git.username.is_empty()),
            ("git.email (GIT_EMAIL)", self.git.email.is_empty()),
            ("git.root (GIT_PATH_TO_ROOT_FOLDER)", self.git.root.is_none()),
            ("gitlab.api_url (GITLAB_API_URL)", self.gitlab.api_url.is_empty()),
            ("gitlab.token (PERSONAL_TOKEN)", self.gitlab.token.is_empty()),
            ("gitlab.project (GITLAB_PROJECT)", self.gitlab.project.is_empty()),
            ("gitlab.remote_url (GIT_REMOTE_URL)", self.gitlab.remote_url.is_empty()),
            ("jira.api_url (JIRA_API_URL)", self.jira.api_url.is_empty()),
            ("jira.email (JIRA_EMAIL)", self.jira.email.is_empty()),
            ("jira.token (JIRA_TOKEN)", self.jira.token.is_empty()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!("missing {}", missing.join(", "))))
        }
    }

    /// Repository root (current directory if unset)
    pub fn repository_root(&self) -> PathBuf {
        self.git.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Per-command timeout
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.git.timeout_secs)
    }

    /// MR assignee, falling back to the committer name
    pub fn default_assignee(&self) -> Option<String> {
        self.git
            .assignee
            .clone()
            .or_else(|| Some(self.git.username.clone()).filter(|u| !u.is_empty()))
    }

    /// MR reviewer, if configured
    pub fn default_reviewer(&self) -> Option<String> {
        self.git.reviewer.clone()
    }

    /// Repository configuration applied at the start of a run
    pub fn repo_setup(&self) -> RepoSetup {
        RepoSetup {
            user_name: self.git.username.clone(),
            user_email: self.git.email.clone(),
            remote_url: self.gitlab.remote_url.clone(),
            access_token: self.gitlab.token.clone(),
        }
    }
}
