//! Output formatters for scan results and deletion history.
//!
//! This module provides machine-readable output formats:
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::output::{JsonOutput, ScanSummary};
//! use dupesweep::error::ExitCode;
//!
//! let summary = ScanSummary::default();
//! let output = JsonOutput::new(&[], &summary, ExitCode::NoDuplicates);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;

pub use csv::{CsvOutput, HistoryCsvOutput};
pub use json::JsonOutput;

use serde::Serialize;

use crate::duplicates::Strategy;

/// Summary statistics for one scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Total number of files discovered by the walker.
    pub total_files: usize,
    /// Total size of all discovered files in bytes.
    pub total_size: u64,
    /// Number of confirmed duplicate groups.
    pub duplicate_groups: usize,
    /// Total number of files inside duplicate groups.
    pub duplicate_files: usize,
    /// Space reclaimable by keeping one copy per group, in bytes.
    pub reclaimable_space: u64,
    /// Non-fatal errors recorded during the walk.
    pub scan_errors: usize,
    /// Duration of the full scan in milliseconds.
    pub scan_duration_ms: u64,
    /// Strategy used for detection.
    pub strategy: Option<Strategy>,
    /// Whether the scan was interrupted.
    pub interrupted: bool,
}

impl Default for ScanSummary {
    fn default() -> Self {
        Self {
            total_files: 0,
            total_size: 0,
            duplicate_groups: 0,
            duplicate_files: 0,
            reclaimable_space: 0,
            scan_errors: 0,
            scan_duration_ms: 0,
            strategy: None,
            interrupted: false,
        }
    }
}
