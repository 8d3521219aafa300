//! Shared command context
//!
//! Loads configuration once and builds every service the backport needs.

use backporter::cherry_pick::WorkflowSettings;
use backporter::config::Config;
use backporter::error::{Error, Result};
use backporter::platform::GitLabService;
use backporter::repo::ShellRunner;
use backporter::tracker::JiraService;
use std::path::Path;

/// Services and settings for one run
///
/// Built once at startup and borrowed by the orchestrator; nothing here is
/// global.
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Shell runner rooted at the repository
    pub runner: ShellRunner,
    /// GitLab service (MR commits, MR creation)
    pub gitlab: GitLabService,
    /// Jira service (ticket lookups)
    pub jira: JiraService,
    /// Settings passed to the orchestrator
    pub settings: WorkflowSettings,
}

impl CommandContext {
    /// Load configuration and create the services
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;

        let root = config.repository_root();
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "repository root {} is not a directory",
                root.display()
            )));
        }
        let runner = ShellRunner::new(root, config.command_timeout());

        let gitlab = GitLabService::new(
            config.gitlab.token.clone(),
            &config.gitlab.api_url,
            config.gitlab.project.clone(),
            config.gitlab.accept_invalid_certs,
        )?;
        let jira = JiraService::new(
            &config.jira.api_url,
            config.jira.email.clone(),
            config.jira.token.clone(),
        )?;
        let settings = WorkflowSettings::from_config(&config);

        Ok(Self {
            config,
            runner,
            gitlab,
            jira,
            settings,
        })
    }
}
