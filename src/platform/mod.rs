//! Source-control host services
//!
//! Resolves merge requests to commits and opens new merge requests.

mod gitlab;

pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{MergeRequestReceipt, NewMergeRequest};
use async_trait::async_trait;

/// Merge request operations needed by a backport
#[async_trait]
pub trait MergeRequestGateway: Send + Sync {
    /// Commit hashes of a merge request, oldest first.
    ///
    /// Fails with `NoCommitsFound` when the MR has no commits.
    async fn merge_request_commits(&self, iid: u64) -> Result<Vec<String>>;

    /// Commit hashes of several merge requests, concatenated in the given order.
    ///
    /// Stops at the first MR that fails to resolve.
    async fn resolve_commits(&self, iids: &[u64]) -> Result<Vec<String>> {
        let mut hashes = Vec::new();
        for iid in iids {
            hashes.extend(self.merge_request_commits(*iid).await?);
        }
        Ok(hashes)
    }

    /// Open a merge request.
    ///
    /// Assignee/reviewer names that cannot be resolved are dropped and
    /// reported in the receipt's warnings rather than failing the call.
    async fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequestReceipt>;
}
