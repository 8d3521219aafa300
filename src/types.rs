//! Core types for backporter

use crate::error::{Error, Result};
use crate::policy::{self, NormalizedVersion};
use serde::{Deserialize, Serialize};

/// Branch kind derived from the tracker issue type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemKind {
    /// A `Task` ticket, picked onto a `feature/` branch
    Feature,
    /// A `Bug` ticket, picked onto a `bugfix/` branch
    Bugfix,
}

impl std::fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Feature => write!(f, "feature"),
            Self::Bugfix => write!(f, "bugfix"),
        }
    }
}

/// Exit code and output streams of a silently captured command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Process exit code (-1 when killed by a signal)
    pub exit_code: i32,
    /// Everything the process wrote to stdout
    pub stdout: String,
    /// Everything the process wrote to stderr
    pub stderr: String,
}

/// Marker git prints when a cherry-pick stops on a merge conflict.
///
/// git writes the `CONFLICT (...)` lines to stdout and only the
/// `could not apply` summary to stderr.
pub const CONFLICT_MARKER: &str = "CONFLICT";

impl CommandOutcome {
    /// Whether the command exited zero
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether the command failed because of a merge conflict
    pub fn is_conflict(&self) -> bool {
        !self.success()
            && (self.stdout.contains(CONFLICT_MARKER) || self.stderr.contains(CONFLICT_MARKER))
    }
}

/// A ticket as fetched from the work tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket key, e.g. `SOCS-100`
    pub key: String,
    /// Raw issue type name (`Task`, `Bug`, ...)
    pub issue_type: String,
    /// First fix version name, if the ticket has one
    pub fix_version: Option<String>,
    /// Ticket summary line
    pub summary: String,
}

/// Everything the orchestrator needs for one run
///
/// Immutable once built. The commit list is never empty and the target
/// version always parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryPickRequest {
    ticket_id: String,
    target_version: String,
    version: NormalizedVersion,
    commit_hashes: Vec<String>,
    working_branch: String,
    merge_request_title: String,
}

impl CherryPickRequest {
    /// Build a request, validating the commit list and target version
    pub fn new(
        ticket_id: impl Into<String>,
        target_version: impl Into<String>,
        commit_hashes: Vec<String>,
        working_branch: impl Into<String>,
        merge_request_title: impl Into<String>,
    ) -> Result<Self> {
        if commit_hashes.is_empty() {
            return Err(Error::EmptyCommitList);
        }
        if let Some(bad) = commit_hashes
            .iter()
            .find(|h| h.is_empty() || h.chars().any(char::is_whitespace))
        {
            return Err(Error::InvalidCommitHash(bad.clone()));
        }

        let target_version = target_version.into();
        let version = policy::normalize(&target_version)?;

        Ok(Self {
            ticket_id: ticket_id.into(),
            target_version,
            version,
            commit_hashes,
            working_branch: working_branch.into(),
            merge_request_title: merge_request_title.into(),
        })
    }

    /// Build a request from a tracker ticket.
    ///
    /// The working branch is `<kind>/<key>` and the merge request title is
    /// `"<key> <summary>"`.
    pub fn for_ticket(ticket: &Ticket, commit_hashes: Vec<String>) -> Result<Self> {
        let kind = policy::classify(&ticket.issue_type)?;
        let fix_version = ticket
            .fix_version
            .as_deref()
            .ok_or_else(|| Error::MissingTicketField {
                ticket: ticket.key.clone(),
                field: "fixVersions",
            })?;

        Self::new(
            ticket.key.clone(),
            fix_version,
            commit_hashes,
            policy::working_branch_for(&ticket.key, kind),
            format!("{} {}", ticket.key, ticket.summary),
        )
    }

    /// Ticket key
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    /// Raw target version as given by the tracker
    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    /// Commits to apply, in application order
    pub fn commit_hashes(&self) -> &[String] {
        &self.commit_hashes
    }

    /// Short-lived branch holding the picked commits
    pub fn working_branch(&self) -> &str {
        &self.working_branch
    }

    /// Title for the merge request
    pub fn merge_request_title(&self) -> &str {
        &self.merge_request_title
    }

    /// Normalized target version
    pub const fn normalized_version(&self) -> &NormalizedVersion {
        &self.version
    }

    /// Release or hotfix branch the commits are picked onto
    pub fn target_branch(&self) -> String {
        policy::target_branch_for(&self.version)
    }
}

/// A merge request as returned by the source-control host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped MR number
    pub iid: u64,
    /// Web URL for the MR
    pub web_url: String,
    /// Source (working) branch
    pub source_branch: String,
    /// Target (release/hotfix) branch
    pub target_branch: String,
    /// MR title
    pub title: String,
}

/// Parameters for opening a merge request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMergeRequest {
    /// Source (working) branch
    pub source_branch: String,
    /// Target (release/hotfix) branch
    pub target_branch: String,
    /// MR title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Username to assign, if any
    pub assignee: Option<String>,
    /// Username to request review from, if any
    pub reviewer: Option<String>,
}

/// Created merge request plus any non-fatal problems hit along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestReceipt {
    /// The created MR
    pub merge_request: MergeRequest,
    /// Warnings such as an assignee that could not be resolved
    pub warnings: Vec<String>,
}

/// How a workflow that did not abort ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Branch pushed and merge request opened
    Success {
        /// The created MR
        merge_request: MergeRequest,
    },
    /// Branch pushed, but the merge request has to be opened by hand
    Degraded {
        /// Why the merge request could not be created
        warning: String,
    },
}

impl Completion {
    /// Whether the merge request was created
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
