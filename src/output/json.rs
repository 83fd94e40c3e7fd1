//! JSON report for scripting.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/data",
//!   "dest_dir": "Duplicate_Shortcuts",
//!   "link_kind": "symlink",
//!   "algorithm": "sha256",
//!   "dry_run": false,
//!   "groups": [
//!     {
//!       "index": 1,
//!       "hash": "e3b0c442...",
//!       "size": 1024,
//!       "files": [
//!         {
//!           "path": "/data/a/report.txt",
//!           "artifact": "00001-001-report.txt",
//!           "status": "created",
//!           "detail": "Duplicate_Shortcuts/00001-001-report.txt"
//!         }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "hashed_files": 99,
//!     "failed_files": 1,
//!     "walk_errors": 0,
//!     "total_size": 1048576,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "artifacts_created": 15,
//!     "artifacts_failed": 0,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 3,
//!     "exit_code_name": "DL003"
//!   },
//!   "destination_error": null
//! }
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use super::{ArtifactStatus, RunOutcome};
use crate::links::LinkKind;
use crate::scanner::HashAlgorithm;

/// One group member and its artifact.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMember {
    /// Path of the duplicate, as discovered
    pub path: PathBuf,
    /// Artifact name
    pub artifact: String,
    /// What happened to the artifact
    #[serde(flatten)]
    pub status: ArtifactStatus,
}

/// A duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// 1-based group counter, as used in artifact names
    pub index: usize,
    /// Digest as 64 lowercase hex characters
    pub hash: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Members in discovery order
    pub files: Vec<JsonMember>,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files discovered
    pub total_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files skipped because they could not be read
    pub failed_files: usize,
    /// Entries the walk could not inspect
    pub walk_errors: usize,
    /// Bytes hashed
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies (excluding one file per group)
    pub duplicate_files: usize,
    /// Bytes held by redundant copies
    pub reclaimable_space: u64,
    /// Artifacts that exist after the run
    pub artifacts_created: usize,
    /// Artifacts that failed or were skipped
    pub artifacts_failed: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DL000")
    pub exit_code_name: String,
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Directory that was scanned
    pub root: PathBuf,
    /// Artifact destination
    pub dest_dir: PathBuf,
    /// Artifact kind
    pub link_kind: LinkKind,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Whether artifacts were only planned
    pub dry_run: bool,
    /// Duplicate groups
    pub groups: Vec<JsonGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
    /// Why the destination could not be created, if it could not
    pub destination_error: Option<String>,
}

impl JsonReport {
    /// Build the report for a finished run.
    #[must_use]
    pub fn new(outcome: &RunOutcome) -> Self {
        let groups = outcome
            .groups_with_artifacts()
            .map(|(index, group, records)| JsonGroup {
                index,
                hash: group.hash_hex(),
                size: group.size(),
                files: records
                    .iter()
                    .map(|record| JsonMember {
                        path: record.plan.source.clone(),
                        artifact: record.plan.name.clone(),
                        status: record.status.clone(),
                    })
                    .collect(),
            })
            .collect();

        let summary = &outcome.summary;
        Self {
            root: outcome.root.clone(),
            dest_dir: outcome.dest_dir.clone(),
            link_kind: outcome.link_kind,
            algorithm: outcome.algorithm,
            dry_run: outcome.dry_run,
            groups,
            summary: JsonSummary {
                total_files: summary.total_files,
                hashed_files: summary.hashed_files,
                failed_files: summary.failed_files,
                walk_errors: summary.scan_errors.len(),
                total_size: summary.total_size,
                duplicate_groups: summary.duplicate_groups,
                duplicate_files: summary.duplicate_files,
                reclaimable_space: summary.reclaimable_space,
                artifacts_created: outcome.created_count(),
                artifacts_failed: outcome.failed_count(),
                scan_duration_ms: u64::try_from(summary.scan_duration.as_millis())
                    .unwrap_or(u64::MAX),
                exit_code: outcome.exit_code.as_i32(),
                exit_code_name: outcome.exit_code.code_prefix().to_string(),
            },
            destination_error: outcome.destination_error.clone(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
