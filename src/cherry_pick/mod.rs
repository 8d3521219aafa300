//! Cherry-pick orchestration
//!
//! Drives one backport end to end: prepare the repository, branch off the
//! release/hotfix line, cherry-pick, hand conflicts to a human, push, clean
//! up and open a merge request.

mod execute;
mod state;

pub use execute::{CherryPicker, WorkflowSettings};
pub use state::WorkflowState;

use crate::error::Result;
use async_trait::async_trait;

/// How the orchestrator talks to the operator
///
/// The CLI implements this with terminal prompts; tests script it.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Report progress
    async fn on_message(&self, message: &str);

    /// Report a non-fatal problem
    async fn on_warning(&self, message: &str);

    /// Report a failed step that will be retried
    async fn on_error(&self, message: &str);

    /// Block until the operator has resolved conflicts in the working tree.
    ///
    /// `attempt` starts at 1 and grows each time `--continue` fails.
    async fn await_conflict_resolution(&self, attempt: u32) -> Result<()>;
}
