//! Error types for backporter

use thiserror::Error;

/// Errors that can occur while preparing or running a backport
#[derive(Debug, Error)]
pub enum Error {
    /// Version string has no trailing numeric run
    #[error("invalid version format: '{0}'")]
    InvalidVersionFormat(String),

    /// Work item type that maps to neither feature nor bugfix
    #[error("unrecognized work item type: {0} (expected Task or Bug)")]
    UnrecognizedWorkItemType(String),

    /// No commits were supplied
    #[error("no commits to cherry-pick")]
    EmptyCommitList,

    /// Commit hash contains whitespace or is empty
    #[error("invalid commit hash: '{0}'")]
    InvalidCommitHash(String),

    /// A strict-mode command exited non-zero
    #[error("command `{command}` failed with exit code {exit_code}")]
    CommandFailed {
        /// The composed command line
        command: String,
        /// Process exit code (-1 when killed by a signal)
        exit_code: i32,
    },

    /// Command did not finish within the configured timeout
    #[error("command `{command}` timed out after {seconds}s")]
    CommandTimeout {
        /// The composed command line
        command: String,
        /// Timeout that was exceeded
        seconds: u64,
    },

    /// Cherry-pick failed for a reason other than a merge conflict
    #[error("cherry-pick failed with exit code {exit_code}:\n{stderr}")]
    CherryPickFailed {
        /// Process exit code
        exit_code: i32,
        /// Captured error stream
        stderr: String,
    },

    /// GitLab API error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Merge request resolved to zero commits
    #[error("no commits found in merge request !{0}")]
    NoCommitsFound(u64),

    /// Jira API error
    #[error("Jira API error: {0}")]
    JiraApi(String),

    /// Ticket does not exist or is not visible with the configured credentials
    #[error("ticket {0} not found, or you don't have permission to see it")]
    TicketNotFound(String),

    /// Ticket payload lacks a field the workflow needs
    #[error("ticket {ticket} has no {field}")]
    MissingTicketField {
        /// Ticket key
        ticket: String,
        /// Missing field path
        field: &'static str,
    },

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Operator input could not be read
    #[error("input error: {0}")]
    Input(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
