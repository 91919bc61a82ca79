//! JSON output formatter for scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "id": 0,
//!       "key": "abc123...",
//!       "strategy": "content-hash",
//!       "total_size": 2048,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": { "total_files": 100, "...": "..." },
//!   "exit_code": 0,
//!   "exit_code_name": "DS000"
//! }
//! ```

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, Strategy};
use crate::error::ExitCode;

use super::ScanSummary;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Stable group identifier.
    pub id: usize,
    /// Group key (content digest or base name).
    pub key: String,
    /// Strategy that produced the group.
    pub strategy: Strategy,
    /// Sum of member sizes in bytes.
    pub total_size: u64,
    /// Space reclaimable within this group.
    pub potential_savings: u64,
    /// Paths of all member files, best-first.
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Convert a [`DuplicateGroup`] for serialization.
    #[must_use]
    pub fn from_group(group: &DuplicateGroup) -> Self {
        Self {
            id: group.id,
            key: group.key.clone(),
            strategy: group.strategy,
            total_size: group.total_size,
            potential_savings: group.potential_savings(),
            files: group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().to_string())
                .collect(),
        }
    }
}

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// All duplicate groups in presentation order.
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan statistics.
    pub summary: ScanSummary,
    /// The exit code number.
    pub exit_code: i32,
    /// The machine-readable exit code name.
    pub exit_code_name: String,
}

impl JsonOutput {
    /// Build the document from scan results.
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: groups.iter().map(JsonDuplicateGroup::from_group).collect(),
            summary: summary.clone(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error from `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error from `serde_json`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
