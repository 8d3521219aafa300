//! Workflow states

/// Step of the git sequence a run is in
///
/// Held in memory only; a run that dies mid-sequence leaves the repository
/// for a human to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Nothing done yet
    Start,
    /// Initial branch recorded, repository configured
    Prepared,
    /// Working branch created off the target branch
    Branched,
    /// Cherry-pick running
    Picking,
    /// Cherry-pick stopped on a conflict, waiting for the operator
    Conflicted,
    /// Resolved files staged, continuing the cherry-pick
    Resuming,
    /// All commits applied; push and cleanup follow
    Pushed,
    /// Working branch pushed, original branch and stash restored
    CleanedUp,
    /// Merge request creation attempted
    MergeRequestRequested,
    /// Workflow finished
    Done,
    /// A step failed; nothing was rolled back
    Aborted,
}

impl WorkflowState {
    /// Whether the run has ended, successfully or not
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Prepared => "prepared",
            Self::Branched => "branched",
            Self::Picking => "picking",
            Self::Conflicted => "conflicted",
            Self::Resuming => "resuming",
            Self::Pushed => "pushed",
            Self::CleanedUp => "cleaned up",
            Self::MergeRequestRequested => "merge request requested",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}
