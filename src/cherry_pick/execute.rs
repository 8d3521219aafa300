//! Cherry-pick execution - the effectful state machine

use crate::cherry_pick::{Interaction, WorkflowState};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::platform::MergeRequestGateway;
use crate::repo::{CommandRunner, GitRepository, RepoSetup};
use crate::types::{CherryPickRequest, Completion, NewMergeRequest};
use tracing::{debug, info, warn};

/// Per-run settings the orchestrator needs from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Repository configuration applied before branching
    pub setup: RepoSetup,
    /// Default MR assignee
    pub assignee: Option<String>,
    /// Default MR reviewer
    pub reviewer: Option<String>,
}

impl WorkflowSettings {
    /// Extract the workflow settings from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            setup: config.repo_setup(),
            assignee: config.default_assignee(),
            reviewer: config.default_reviewer(),
        }
    }
}

/// Runs the cherry-pick workflow against one repository
///
/// Not safe to run concurrently against the same repository: it moves
/// HEAD, the stash and the push remote without locking.
pub struct CherryPicker<'a> {
    git: GitRepository<'a>,
    platform: &'a dyn MergeRequestGateway,
    interaction: &'a dyn Interaction,
    settings: &'a WorkflowSettings,
    history: Vec<WorkflowState>,
}

impl<'a> CherryPicker<'a> {
    /// Create an orchestrator
    pub fn new(
        runner: &'a dyn CommandRunner,
        platform: &'a dyn MergeRequestGateway,
        interaction: &'a dyn Interaction,
        settings: &'a WorkflowSettings,
    ) -> Self {
        Self {
            git: GitRepository::new(runner),
            platform,
            interaction,
            settings,
            history: vec![WorkflowState::Start],
        }
    }

    /// Current state
    pub fn state(&self) -> WorkflowState {
        self.history
            .last()
            .copied()
            .unwrap_or(WorkflowState::Start)
    }

    /// Every state visited during the last run, in order
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!(from = %self.state(), to = %next, "workflow transition");
        self.history.push(next);
    }

    /// Run the whole workflow.
    ///
    /// Returns `Ok` once the branch is pushed, whether or not the merge
    /// request could be opened. Any other failure aborts immediately without
    /// cleanup, leaving the repository as it is for inspection.
    pub async fn execute(&mut self, request: &CherryPickRequest) -> Result<Completion> {
        self.history = vec![WorkflowState::Start];

        match self.run(request).await {
            Ok(completion) => {
                self.transition(WorkflowState::Done);
                Ok(completion)
            }
            Err(e) => {
                warn!(state = %self.state(), error = %e, "workflow aborted");
                self.transition(WorkflowState::Aborted);
                Err(e)
            }
        }
    }

    async fn run(&mut self, request: &CherryPickRequest) -> Result<Completion> {
        let target_branch = request.target_branch();
        let working_branch = request.working_branch();
        info!(
            ticket = request.ticket_id(),
            %target_branch,
            %working_branch,
            "starting backport"
        );

        // Start -> Prepared
        let initial_branch = self.git.current_branch().await?;
        debug!(%initial_branch, "recorded initial branch");
        self.git.configure(&self.settings.setup).await?;
        self.transition(WorkflowState::Prepared);

        // Prepared -> Branched
        let stashed = self.git.has_local_changes().await?;
        if stashed {
            self.git.stash().await?;
        } else {
            debug!("working tree clean, nothing to stash");
        }
        self.git.pull(&target_branch).await?;
        self.git.checkout(&target_branch).await?;
        self.git.create_branch(working_branch).await?;
        self.git.fetch().await?;
        self.transition(WorkflowState::Branched);

        // Branched -> Picking -> {Conflicted | Pushed}
        self.transition(WorkflowState::Picking);
        self.interaction
            .on_message(&format!(
                "Cherry-picking {} commit(s) onto {working_branch}",
                request.commit_hashes().len()
            ))
            .await;

        let outcome = self.git.cherry_pick(request.commit_hashes()).await?;
        if outcome.is_conflict() {
            self.interaction
                .on_warning("A merge conflict occurred!")
                .await;
            self.resolve_conflicts().await?;
        } else if !outcome.success() {
            return Err(Error::CherryPickFailed {
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            });
        }
        self.transition(WorkflowState::Pushed);

        // Pushed -> CleanedUp
        self.git.push(working_branch).await?;
        self.git.checkout(&initial_branch).await?;
        self.git.delete_branch(working_branch).await?;
        if stashed {
            self.git.stash_pop().await?;
        }
        self.transition(WorkflowState::CleanedUp);

        // CleanedUp -> MergeRequestRequested
        Ok(self.open_merge_request(request, &target_branch).await)
    }

    /// Hand the conflict to the operator until `--continue` succeeds.
    ///
    /// Unbounded: conflict resolution is human work, and the only way out
    /// besides success is killing the process.
    async fn resolve_conflicts(&mut self) -> Result<()> {
        let mut attempt = 1;
        loop {
            self.transition(WorkflowState::Conflicted);
            self.interaction.await_conflict_resolution(attempt).await?;

            self.transition(WorkflowState::Resuming);
            self.interaction
                .on_message("Resuming... staging resolved files and continuing cherry-pick")
                .await;
            self.git.stage_all().await?;

            let outcome = self.git.continue_cherry_pick().await?;
            if outcome.success() {
                self.interaction
                    .on_message("Cherry-pick completed successfully")
                    .await;
                return Ok(());
            }

            debug!(attempt, exit_code = outcome.exit_code, "cherry-pick --continue failed");
            self.interaction
                .on_error(&format!("Still having trouble: {}", outcome.stderr.trim()))
                .await;
            attempt += 1;
        }
    }

    async fn open_merge_request(
        &mut self,
        request: &CherryPickRequest,
        target_branch: &str,
    ) -> Completion {
        self.transition(WorkflowState::MergeRequestRequested);

        let new_mr = NewMergeRequest {
            source_branch: request.working_branch().to_string(),
            target_branch: target_branch.to_string(),
            title: request.merge_request_title().to_string(),
            description: None,
            assignee: self.settings.assignee.clone(),
            reviewer: self.settings.reviewer.clone(),
        };

        match self.platform.create_merge_request(&new_mr).await {
            Ok(receipt) => {
                for warning in &receipt.warnings {
                    self.interaction.on_warning(warning).await;
                }
                Completion::Success {
                    merge_request: receipt.merge_request,
                }
            }
            Err(e) => {
                let warning = format!("Failed to create merge request, open it manually: {e}");
                warn!(error = %e, "merge request creation failed");
                self.interaction.on_warning(&warning).await;
                Completion::Degraded { warning }
            }
        }
    }
}
