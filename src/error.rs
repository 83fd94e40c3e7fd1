//! Exit codes and structured errors.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: duplicates found and every artifact created
/// - 1: fatal error (invalid directory, bad configuration, aborted prompt)
/// - 2: scan completed, no duplicates
/// - 3: duplicates found but some files or artifacts failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Duplicates were found and linked.
    Success = 0,
    /// The run could not complete.
    GeneralError = 1,
    /// The scan found no duplicates.
    NoDuplicates = 2,
    /// The run completed with some per-file or per-artifact failures.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DL000",
            Self::GeneralError => "DL001",
            Self::NoDuplicates => "DL002",
            Self::PartialSuccess => "DL003",
        }
    }

    /// Pick the exit code for a finished run.
    ///
    /// `had_failures` covers files that could not be read or hashed as well
    /// as artifacts that could not be created.
    #[must_use]
    pub fn for_outcome(group_count: usize, had_failures: bool) -> Self {
        match (group_count, had_failures) {
            (_, true) => Self::PartialSuccess,
            (0, false) => Self::NoDuplicates,
            (_, false) => Self::Success,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DL001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
