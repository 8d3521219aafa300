//! GitLab merge request service

use crate::error::{Error, Result};
use crate::platform::MergeRequestGateway;
use crate::types::{MergeRequest, MergeRequestReceipt, NewMergeRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    api_base: String,
    project_path: String,
}

#[derive(Deserialize)]
struct MergeRequestResponse {
    iid: u64,
    web_url: String,
    source_branch: String,
    target_branch: String,
    title: String,
}

impl From<MergeRequestResponse> for MergeRequest {
    fn from(mr: MergeRequestResponse) -> Self {
        Self {
            iid: mr.iid,
            web_url: mr.web_url,
            source_branch: mr.source_branch,
            target_branch: mr.target_branch,
            title: mr.title,
        }
    }
}

#[derive(Deserialize)]
struct MrCommit {
    id: String,
}

#[derive(Deserialize)]
struct User {
    id: u64,
}

#[derive(Serialize)]
struct CreateMrPayload<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    remove_source_branch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee_id: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reviewer_ids: Vec<u64>,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl GitLabService {
    /// Create a new GitLab service.
    ///
    /// `api_base` is the v4 API root (e.g. `https://gitlab.example.com/api/v4`),
    /// `project_path` the `group/project` path every call is scoped to.
    pub fn new(
        token: String,
        api_base: &str,
        project_path: String,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            project_path,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }

    /// Look up a user id by username
    pub async fn find_user_id(&self, username: &str) -> Result<Option<u64>> {
        debug!(username, "looking up user");
        let users: Vec<User> = self
            .client
            .get(self.api_url("/users"))
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("username", username)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        Ok(users.first().map(|u| u.id))
    }

    /// Resolve a user for an MR role, turning any failure into a warning
    async fn resolve_user(&self, role: &str, username: &str, warnings: &mut Vec<String>) -> Option<u64> {
        match self.find_user_id(username).await {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                let msg = format!("{role} '{username}' not found in GitLab, skipping");
                warn!("{msg}");
                warnings.push(msg);
                None
            }
            Err(e) => {
                let msg = format!("failed to look up {role} '{username}': {e}, skipping");
                warn!("{msg}");
                warnings.push(msg);
                None
            }
        }
    }
}

#[async_trait]
impl MergeRequestGateway for GitLabService {
    async fn merge_request_commits(&self, iid: u64) -> Result<Vec<String>> {
        debug!(mr_iid = iid, "listing MR commits");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}/commits",
            self.encoded_project(),
            iid
        ));

        let commits: Vec<MrCommit> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        if commits.is_empty() {
            return Err(Error::NoCommitsFound(iid));
        }

        // GitLab lists newest first; cherry-pick needs oldest first
        let hashes: Vec<String> = commits.into_iter().rev().map(|c| c.id).collect();
        debug!(mr_iid = iid, count = hashes.len(), "listed MR commits");
        Ok(hashes)
    }

    async fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequestReceipt> {
        debug!(
            source = %request.source_branch,
            target = %request.target_branch,
            "creating MR"
        );
        let mut warnings = Vec::new();

        let assignee_id = match request.assignee.as_deref() {
            Some(name) => self.resolve_user("assignee", name, &mut warnings).await,
            None => None,
        };
        let reviewer_id = match request.reviewer.as_deref() {
            Some(name) => self.resolve_user("reviewer", name, &mut warnings).await,
            None => None,
        };

        let payload = CreateMrPayload {
            source_branch: &request.source_branch,
            target_branch: &request.target_branch,
            title: &request.title,
            description: request.description.as_deref(),
            remove_source_branch: true,
            assignee_id,
            reviewer_ids: reviewer_id.into_iter().collect(),
        };

        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let mr: MergeRequestResponse = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let merge_request: MergeRequest = mr.into();
        debug!(mr_iid = merge_request.iid, "created MR");
        Ok(MergeRequestReceipt {
            merge_request,
            warnings,
        })
    }
}
