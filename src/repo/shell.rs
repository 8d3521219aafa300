//! Process-backed command runner

use crate::error::{Error, Result};
use crate::repo::CommandRunner;
use crate::types::CommandOutcome;
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default per-command timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 240;

/// Runs commands through `sh -c` inside the repository root
#[derive(Debug, Clone)]
pub struct ShellRunner {
    root: PathBuf,
    timeout: Duration,
}

impl ShellRunner {
    /// Create a runner for the given repository root
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    /// Repository root every command runs in
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(&self.root)
            .kill_on_drop(true);
        cmd
    }

    /// Await `fut`, giving up (and killing the child on drop) after the timeout
    async fn bounded<T>(
        &self,
        command: &str,
        fut: impl Future<Output = std::io::Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::CommandTimeout {
                command: command.to_string(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(Error::from)
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<()> {
        debug!(command, "running");
        let mut child = self
            .command(command)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        let status = self.bounded(command, child.wait()).await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: command.to_string(),
                exit_code: exit_code(status),
            })
        }
    }

    async fn run_captured(&self, command: &str) -> Result<CommandOutcome> {
        debug!(command, "running (captured)");
        let child = self
            .command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let output = self.bounded(command, child.wait_with_output()).await?;
        let outcome = CommandOutcome {
            exit_code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command, exit_code = outcome.exit_code, "captured");
        Ok(outcome)
    }

    async fn read(&self, command: &str) -> Result<String> {
        debug!(command, "reading");
        let child = self
            .command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let output = self.bounded(command, child.wait_with_output()).await?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                exit_code: exit_code(output.status),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
