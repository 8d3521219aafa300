//! Version and branch naming policy
//!
//! Pure functions, no I/O: turn a tracker fix version into the release or
//! hotfix branch to pick onto, and a ticket into its working branch name.

use crate::error::{Error, Result};
use crate::types::WorkItemKind;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Trailing `<digits>(.<digits>)*` run, e.g. `2.1.5` in `PX 2.1.5`
static TRAILING_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)*)$").expect("valid version regex"));

/// Minimum number of components after normalization
const MIN_COMPONENTS: usize = 3;

/// A version with at least three numeric components
///
/// Missing components are right-padded with `0`, so `2` becomes `2.0.0`.
/// Extra components (e.g. the `1` in `2.0.0.1`) are kept, since they decide
/// between a release and a hotfix branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion {
    components: Vec<String>,
}

impl NormalizedVersion {
    /// The numeric components, as written in the source string
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Whether this is a `.0` milestone cut (`X.Y.0` with nothing after it)
    pub fn is_milestone(&self) -> bool {
        self.components.len() == MIN_COMPONENTS && self.components[2] == "0"
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

/// Parse a free-form version string into a normalized version.
///
/// The raw string may carry a prefix such as a product code (`v2.1`,
/// `PX 3`); only the trailing numeric run is used.
pub fn normalize(raw: &str) -> Result<NormalizedVersion> {
    let run = TRAILING_VERSION
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| Error::InvalidVersionFormat(raw.to_string()))?;

    let mut components: Vec<String> = run.as_str().split('.').map(String::from).collect();
    while components.len() < MIN_COMPONENTS {
        components.push("0".to_string());
    }

    Ok(NormalizedVersion { components })
}

/// Branch that the commits are picked onto.
///
/// `X.Y.0` maps to `release/X.Y.0`; every later patch ships from
/// `hotfix/<version>`.
pub fn target_branch_for(version: &NormalizedVersion) -> String {
    if version.is_milestone() {
        format!("release/{version}")
    } else {
        format!("hotfix/{version}")
    }
}

/// Working branch created for a ticket, e.g. `feature/SOCS-100`
pub fn working_branch_for(ticket_id: &str, kind: WorkItemKind) -> String {
    format!("{kind}/{ticket_id}")
}

/// Map a tracker issue type to a branch kind.
///
/// Anything other than `Task` or `Bug` is rejected rather than guessed.
pub fn classify(work_item_type: &str) -> Result<WorkItemKind> {
    match work_item_type {
        "Task" => Ok(WorkItemKind::Feature),
        "Bug" => Ok(WorkItemKind::Bugfix),
        other => Err(Error::UnrecognizedWorkItemType(other.to_string())),
    }
}
