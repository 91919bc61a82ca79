//! Exit codes and the structured error surface.
//!
//! Every run resolves to one [`ExitCode`]; scripts can branch on the
//! numeric code or match the `DS###` prefix that accompanies error output.

use serde::Serialize;

/// Process exit code for a completed or failed run.
///
/// "No duplicates" is a distinct, successful outcome rather than an error,
/// so automation can tell an empty result from a broken scan. 130 follows
/// the shell convention of 128 + SIGINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally and found duplicates.
    Success = 0,
    /// Failed before or during the run.
    GeneralError = 1,
    /// Completed normally with nothing to report.
    NoDuplicates = 2,
    /// Completed, but some files could not be scanned or deleted.
    PartialSuccess = 3,
    /// Stopped early on Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Numeric value passed to `std::process::exit`.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable machine-readable prefix used in error output.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }
}

/// Error document emitted on stderr under `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Code prefix, e.g. "DS001".
    pub code: String,
    /// Numeric exit code.
    pub exit_code: i32,
    /// Human-readable message.
    pub message: String,
    /// Whether the run was interrupted rather than failed.
    pub interrupted: bool,
}

impl StructuredError {
    /// Build the document from a fatal error and its resolved exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
