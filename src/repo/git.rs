//! Typed git operations over a [`CommandRunner`]

use crate::error::{Error, Result};
use crate::repo::CommandRunner;
use crate::types::CommandOutcome;
use tracing::debug;
use url::Url;

/// Remote every branch is pulled from and pushed to
const REMOTE: &str = "origin";

/// Username GitLab expects alongside a personal access token
const TOKEN_USER: &str = "oauth2";

/// One-time repository configuration applied before branching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSetup {
    /// Committer name (written to global git config)
    pub user_name: String,
    /// Committer email (written to global git config)
    pub user_email: String,
    /// Push remote URL without credentials
    pub remote_url: String,
    /// Access token embedded into the push remote
    pub access_token: String,
}

/// Quote a value for `sh -c` unless it is made only of safe characters
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./@:+=,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Embed `oauth2:<token>` credentials into an HTTP(S) remote URL
pub fn credentialed_remote(remote_url: &str, token: &str) -> Result<String> {
    let mut url = Url::parse(remote_url)
        .map_err(|e| Error::Config(format!("invalid remote url '{remote_url}': {e}")))?;
    url.set_username(TOKEN_USER)
        .and_then(|()| url.set_password(Some(token)))
        .map_err(|()| Error::Config(format!("remote url '{remote_url}' cannot hold credentials")))?;
    Ok(url.into())
}

/// Git operations for one repository, composed as shell commands
pub struct GitRepository<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> GitRepository<'a> {
    /// Wrap a command runner
    pub const fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Name of the currently checked out branch
    pub async fn current_branch(&self) -> Result<String> {
        self.runner.read("git rev-parse --abbrev-ref HEAD").await
    }

    /// Whether tracked files have uncommitted changes (i.e. a stash would save something)
    pub async fn has_local_changes(&self) -> Result<bool> {
        let status = self
            .runner
            .read("git status --porcelain --untracked-files=no")
            .await?;
        Ok(!status.is_empty())
    }

    /// Apply repository and committer configuration and rewrite the push remote
    pub async fn configure(&self, setup: &RepoSetup) -> Result<()> {
        debug!(user = %setup.user_name, "configuring repository");
        let remote = credentialed_remote(&setup.remote_url, &setup.access_token)?;

        self.runner.run("git config core.fileMode false").await?;
        self.runner.run("git config pull.rebase true").await?;
        self.runner
            .run(&format!(
                "git config --global user.name {}",
                shell_quote(&setup.user_name)
            ))
            .await?;
        self.runner
            .run(&format!(
                "git config --global user.email {}",
                shell_quote(&setup.user_email)
            ))
            .await?;
        self.runner
            .run(&format!(
                "git remote set-url {REMOTE} {}",
                shell_quote(&remote)
            ))
            .await
    }

    /// Stash uncommitted changes
    pub async fn stash(&self) -> Result<()> {
        self.runner.run("git stash push").await
    }

    /// Restore the most recent stash
    pub async fn stash_pop(&self) -> Result<()> {
        self.runner.run("git stash pop").await
    }

    /// Pull a branch from the remote into the current branch
    pub async fn pull(&self, branch: &str) -> Result<()> {
        self.runner
            .run(&format!("git pull {REMOTE} {}", shell_quote(branch)))
            .await
    }

    /// Check out an existing branch
    pub async fn checkout(&self, branch: &str) -> Result<()> {
        self.runner
            .run(&format!("git checkout {}", shell_quote(branch)))
            .await
    }

    /// Create a branch at HEAD and switch to it
    pub async fn create_branch(&self, branch: &str) -> Result<()> {
        self.runner
            .run(&format!("git checkout -b {}", shell_quote(branch)))
            .await
    }

    /// Fetch the remote
    pub async fn fetch(&self) -> Result<()> {
        self.runner.run(&format!("git fetch {REMOTE}")).await
    }

    /// Cherry-pick all commits in one invocation, recording their origin (`-x`)
    pub async fn cherry_pick(&self, commit_hashes: &[String]) -> Result<CommandOutcome> {
        let hashes: Vec<String> = commit_hashes.iter().map(|h| shell_quote(h)).collect();
        self.runner
            .run_captured(&format!("git cherry-pick -x {}", hashes.join(" ")))
            .await
    }

    /// Stage every change in the working tree
    pub async fn stage_all(&self) -> Result<()> {
        self.runner.run("git add .").await
    }

    /// Continue an interrupted cherry-pick without opening an editor
    pub async fn continue_cherry_pick(&self) -> Result<CommandOutcome> {
        self.runner
            .run_captured("git -c core.editor=true cherry-pick --continue")
            .await
    }

    /// Push a branch to the remote
    pub async fn push(&self, branch: &str) -> Result<()> {
        self.runner
            .run(&format!("git push {REMOTE} {}", shell_quote(branch)))
            .await
    }

    /// Force-delete a local branch
    pub async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.runner
            .run(&format!("git branch -D {}", shell_quote(branch)))
            .await
    }
}
