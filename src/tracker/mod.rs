//! Work tracker lookups
//!
//! The tracker supplies the issue type, fix version and summary of a ticket.

mod jira;

pub use jira::JiraService;

use crate::error::{Error, Result};
use crate::policy::{self, NormalizedVersion};
use crate::types::{Ticket, WorkItemKind};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Fetches tickets from a work tracker
#[async_trait]
pub trait WorkTracker: Send + Sync {
    /// Fetch one ticket by key
    async fn fetch_ticket(&self, key: &str) -> Result<Ticket>;
}

/// Tickets fetched during one run, keyed by ticket key
///
/// Owned by the caller and dropped with it, so nothing outlives a single
/// workflow execution.
pub struct TicketCache<'a> {
    tracker: &'a dyn WorkTracker,
    tickets: HashMap<String, Ticket>,
}

impl<'a> TicketCache<'a> {
    /// Create an empty cache over a tracker
    pub fn new(tracker: &'a dyn WorkTracker) -> Self {
        Self {
            tracker,
            tickets: HashMap::new(),
        }
    }

    /// Get a ticket, fetching it on first access
    pub async fn get(&mut self, key: &str) -> Result<&Ticket> {
        if !self.tickets.contains_key(key) {
            debug!(ticket = key, "fetching ticket");
            let ticket = self.tracker.fetch_ticket(key).await?;
            self.tickets.insert(key.to_string(), ticket);
        }
        self.tickets
            .get(key)
            .ok_or_else(|| Error::TicketNotFound(key.to_string()))
    }

    /// Branch kind for the ticket's issue type
    pub async fn work_item_kind(&mut self, key: &str) -> Result<WorkItemKind> {
        let ticket = self.get(key).await?;
        policy::classify(&ticket.issue_type)
    }

    /// Normalized fix version of the ticket
    pub async fn fix_version(&mut self, key: &str) -> Result<NormalizedVersion> {
        let ticket = self.get(key).await?;
        let raw = ticket
            .fix_version
            .as_deref()
            .ok_or_else(|| Error::MissingTicketField {
                ticket: key.to_string(),
                field: "fixVersions",
            })?;
        policy::normalize(raw)
    }

    /// Ticket summary line
    pub async fn summary(&mut self, key: &str) -> Result<String> {
        Ok(self.get(key).await?.summary.clone())
    }
}
