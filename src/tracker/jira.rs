//! Jira work tracker service

use crate::error::{Error, Result};
use crate::tracker::WorkTracker;
use crate::types::Ticket;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Jira REST service using reqwest
pub struct JiraService {
    client: Client,
    api_base: String,
    email: String,
    token: String,
}

#[derive(Deserialize)]
struct Issue {
    fields: IssueFields,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueFields {
    summary: Option<String>,
    issuetype: Option<IssueType>,
    #[serde(default)]
    fix_versions: Vec<FixVersion>,
}

#[derive(Deserialize)]
struct IssueType {
    name: Option<String>,
}

#[derive(Deserialize)]
struct FixVersion {
    name: Option<String>,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl JiraService {
    /// Create a new Jira service.
    ///
    /// `api_base` is the REST root (e.g. `https://acme.atlassian.net/rest/api/2`).
    pub fn new(api_base: &str, email: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::JiraApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            email,
            token,
        })
    }
}

#[async_trait]
impl WorkTracker for JiraService {
    async fn fetch_ticket(&self, key: &str) -> Result<Ticket> {
        debug!(ticket = key, "fetching issue");
        let url = format!(
            "{}/issue/{}",
            self.api_base,
            urlencoding::encode(key)
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.token))
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN
        ) {
            return Err(Error::TicketNotFound(key.to_string()));
        }

        let issue: Issue = response
            .error_for_status()
            .map_err(|e| Error::JiraApi(e.to_string()))?
            .json()
            .await?;

        let fields = issue.fields;
        let summary = non_empty(fields.summary).ok_or_else(|| Error::MissingTicketField {
            ticket: key.to_string(),
            field: "summary",
        })?;
        let issue_type = non_empty(fields.issuetype.and_then(|t| t.name)).ok_or_else(|| {
            Error::MissingTicketField {
                ticket: key.to_string(),
                field: "issuetype",
            }
        })?;
        let fix_version = non_empty(
            fields
                .fix_versions
                .into_iter()
                .next()
                .and_then(|v| v.name),
        );

        debug!(ticket = key, %issue_type, ?fix_version, "fetched issue");
        Ok(Ticket {
            key: key.to_string(),
            issue_type,
            fix_version,
            summary,
        })
    }
}
