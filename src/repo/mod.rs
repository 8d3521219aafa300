//! Repository gateway
//!
//! Every git invocation is a single composed command string run in the
//! configured repository root. Two modes:
//! - strict ([`CommandRunner::run`], [`CommandRunner::read`]): a non-zero
//!   exit is an error
//! - silent capture ([`CommandRunner::run_captured`]): the exit code and
//!   stderr are returned for the caller to branch on

mod git;
mod shell;

pub use git::{GitRepository, RepoSetup, credentialed_remote, shell_quote};
pub use shell::{DEFAULT_TIMEOUT_SECS, ShellRunner};

use crate::error::Result;
use crate::types::CommandOutcome;
use async_trait::async_trait;

/// Executes composed shell commands against one repository
///
/// Implemented by [`ShellRunner`] for real processes and by test doubles
/// that script outcomes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command with live output, failing on a non-zero exit
    async fn run(&self, command: &str) -> Result<()>;

    /// Run a command without streaming and return its outcome.
    ///
    /// A non-zero exit is not an error here; only spawn failures and
    /// timeouts are.
    async fn run_captured(&self, command: &str) -> Result<CommandOutcome>;

    /// Run a command and return its trimmed stdout, failing on a non-zero exit
    async fn read(&self, command: &str) -> Result<String>;
}
