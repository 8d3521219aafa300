//! backporter - cherry-pick tickets onto release/hotfix branches
//!
//! Given a ticket (its issue type, fix version and summary come from Jira)
//! and a list of commits (typed, or resolved from GitLab merge requests),
//! this crate creates a working branch off the matching `release/` or
//! `hotfix/` branch, cherry-picks the commits, waits for a human when a
//! conflict stops the pick, pushes, restores the original checkout and opens
//! a merge request.
//!
//! The pieces, leaf first:
//! - [`policy`]: version normalization and branch naming (pure)
//! - [`repo`]: shell/git command execution with strict and captured modes
//! - [`platform`]: GitLab merge request lookups and creation
//! - [`tracker`]: Jira ticket lookups with a per-run cache
//! - [`cherry_pick`]: the workflow state machine

pub mod cherry_pick;
pub mod config;
pub mod error;
pub mod platform;
pub mod policy;
pub mod repo;
pub mod tracker;
pub mod types;
