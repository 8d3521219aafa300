//! Mock merge request gateway for testing

#![allow(dead_code)]

use async_trait::async_trait;
use backporter::error::{Error, Result};
use backporter::platform::MergeRequestGateway;
use backporter::types::{MergeRequest, MergeRequestReceipt, NewMergeRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Simple mock gateway
///
/// Features:
/// - Auto-incrementing MR iids
/// - Call tracking for verification
/// - Configurable commits per MR
/// - Error injection and receipt warnings
pub struct MockMergeRequestGateway {
    next_iid: AtomicU64,
    commits: Mutex<HashMap<u64, Vec<String>>>,
    receipt_warnings: Mutex<Vec<String>>,
    // Call tracking
    commits_calls: Mutex<Vec<u64>>,
    create_mr_calls: Mutex<Vec<NewMergeRequest>>,
    // Error injection
    error_on_create_mr: Mutex<Option<String>>,
}

impl MockMergeRequestGateway {
    /// Create a mock with no MRs
    pub fn new() -> Self {
        Self {
            next_iid: AtomicU64::new(100),
            commits: Mutex::new(HashMap::new()),
            receipt_warnings: Mutex::new(Vec::new()),
            commits_calls: Mutex::new(Vec::new()),
            create_mr_calls: Mutex::new(Vec::new()),
            error_on_create_mr: Mutex::new(None),
        }
    }

    /// Set the commits (oldest first) for an MR
    pub fn set_commits(&self, iid: u64, hashes: &[&str]) {
        self.commits
            .lock()
            .unwrap()
            .insert(iid, hashes.iter().map(|h| (*h).to_string()).collect());
    }

    /// Make `create_merge_request` return an error
    pub fn fail_create_mr(&self, msg: &str) {
        *self.error_on_create_mr.lock().unwrap() = Some(msg.to_string());
    }

    /// Warnings attached to the next receipt
    pub fn set_receipt_warnings(&self, warnings: &[&str]) {
        *self.receipt_warnings.lock().unwrap() =
            warnings.iter().map(|w| (*w).to_string()).collect();
    }

    /// MR iids whose commits were requested, in order
    pub fn get_commits_calls(&self) -> Vec<u64> {
        self.commits_calls.lock().unwrap().clone()
    }

    /// Every `create_merge_request` call
    pub fn get_create_mr_calls(&self) -> Vec<NewMergeRequest> {
        self.create_mr_calls.lock().unwrap().clone()
    }
}

impl Default for MockMergeRequestGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MergeRequestGateway for MockMergeRequestGateway {
    async fn merge_request_commits(&self, iid: u64) -> Result<Vec<String>> {
        self.commits_calls.lock().unwrap().push(iid);
        match self.commits.lock().unwrap().get(&iid) {
            Some(hashes) if !hashes.is_empty() => Ok(hashes.clone()),
            _ => Err(Error::NoCommitsFound(iid)),
        }
    }

    async fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequestReceipt> {
        self.create_mr_calls.lock().unwrap().push(request.clone());

        if let Some(msg) = self.error_on_create_mr.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let iid = self.next_iid.fetch_add(1, Ordering::SeqCst);
        Ok(MergeRequestReceipt {
            merge_request: MergeRequest {
                iid,
                web_url: format!("https://gitlab.example.com/px/platform/-/merge_requests/{iid}"),
                source_branch: request.source_branch.clone(),
                target_branch: request.target_branch.clone(),
                title: request.title.clone(),
            },
            warnings: self.receipt_warnings.lock().unwrap().clone(),
        })
    }
}
