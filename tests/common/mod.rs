//! Shared test utilities

#![allow(dead_code)]

mod mock_platform;
mod mock_runner;

pub use mock_platform::MockMergeRequestGateway;
pub use mock_runner::*;

use async_trait::async_trait;
use backporter::cherry_pick::WorkflowSettings;
use backporter::error::{Error, Result};
use backporter::repo::RepoSetup;
use backporter::tracker::WorkTracker;
use backporter::types::{CherryPickRequest, Ticket};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn make_ticket(key: &str, issue_type: &str, fix_version: &str) -> Ticket {
    Ticket {
        key: key.to_string(),
        issue_type: issue_type.to_string(),
        fix_version: Some(fix_version.to_string()),
        summary: "Fix login redirect".to_string(),
    }
}

pub fn make_request(ticket: &Ticket, hashes: &[&str]) -> CherryPickRequest {
    CherryPickRequest::for_ticket(ticket, hashes.iter().map(|h| (*h).to_string()).collect())
        .unwrap()
}

pub fn test_settings() -> WorkflowSettings {
    WorkflowSettings {
        setup: RepoSetup {
            user_name: "jdoe".to_string(),
            user_email: "jdoe@example.com".to_string(),
            remote_url: "https://gitlab.example.com/px/platform.git".to_string(),
            access_token: "glpat-secret".to_string(),
        },
        assignee: Some("jdoe".to_string()),
        reviewer: Some("asmith".to_string()),
    }
}

/// In-memory tracker that counts fetches per key
#[derive(Default)]
pub struct MockTracker {
    tickets: HashMap<String, Ticket>,
    fetches: Mutex<Vec<String>>,
}

impl MockTracker {
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: tickets.into_iter().map(|t| (t.key.clone(), t)).collect(),
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self, key: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|k| *k == key)
            .count()
    }
}

#[async_trait]
impl WorkTracker for MockTracker {
    async fn fetch_ticket(&self, key: &str) -> Result<Ticket> {
        self.fetches.lock().unwrap().push(key.to_string());
        self.tickets
            .get(key)
            .cloned()
            .ok_or_else(|| Error::TicketNotFound(key.to_string()))
    }
}
