//! Run reports.
//!
//! This module provides two renderings of a finished run:
//! - [`TextReport`] for people, colored with `yansi`
//! - [`JsonReport`] for scripts
//!
//! Both read the same [`RunOutcome`], which pairs every duplicate group with
//! the artifacts named for its members.
//!
//! # Example
//!
//! ```no_run
//! use dupelink::duplicates::DuplicateFinder;
//! use dupelink::error::ExitCode;
//! use dupelink::links::{plan_links, LinkKind};
//! use dupelink::output::{ArtifactRecord, RunOutcome, TextReport};
//! use dupelink::scanner::HashAlgorithm;
//! use std::path::{Path, PathBuf};
//!
//! let (groups, summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let artifacts = ArtifactRecord::planned(plan_links(&groups));
//! let outcome = RunOutcome {
//!     root: PathBuf::from("."),
//!     dest_dir: PathBuf::from("Duplicate_Shortcuts"),
//!     link_kind: LinkKind::Symlink,
//!     algorithm: HashAlgorithm::Sha256,
//!     dry_run: true,
//!     exit_code: ExitCode::for_outcome(groups.len(), summary.has_errors()),
//!     groups,
//!     summary,
//!     artifacts,
//!     destination_error: None,
//! };
//! TextReport::new(&outcome, false).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

use std::path::PathBuf;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;
use crate::links::{EmitSummary, LinkKind, PlannedArtifact};
use crate::scanner::HashAlgorithm;

pub use json::{JsonOutputError, JsonReport};
pub use text::TextReport;

/// What happened to one planned artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ArtifactStatus {
    /// Named only (`--dry-run`)
    Planned,
    /// Created at the given path
    Created(PathBuf),
    /// Creation failed with the given message
    Failed(String),
    /// Not attempted because the destination was unusable
    Skipped,
}

/// One planned artifact and its fate.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    /// Counters, source and name
    pub plan: PlannedArtifact,
    /// Outcome
    pub status: ArtifactStatus,
}

impl ArtifactRecord {
    /// Records for a dry run.
    #[must_use]
    pub fn planned(plans: Vec<PlannedArtifact>) -> Vec<Self> {
        Self::all_with(plans, &ArtifactStatus::Planned)
    }

    /// Records for a run whose destination could not be created.
    #[must_use]
    pub fn skipped(plans: Vec<PlannedArtifact>) -> Vec<Self> {
        Self::all_with(plans, &ArtifactStatus::Skipped)
    }

    /// Records for a run that attempted every artifact, in plan order.
    #[must_use]
    pub fn from_emit(summary: EmitSummary) -> Vec<Self> {
        let mut records: Vec<Self> = summary
            .created
            .into_iter()
            .map(|a| Self {
                plan: a.plan,
                status: ArtifactStatus::Created(a.path),
            })
            .chain(summary.failures.into_iter().map(|f| Self {
                plan: f.plan,
                status: ArtifactStatus::Failed(f.error.to_string()),
            }))
            .collect();
        records.sort_by_key(|r| (r.plan.group_index, r.plan.member_index));
        records
    }

    fn all_with(plans: Vec<PlannedArtifact>, status: &ArtifactStatus) -> Vec<Self> {
        plans
            .into_iter()
            .map(|plan| Self {
                plan,
                status: status.clone(),
            })
            .collect()
    }

    /// Whether this artifact counts against a clean exit.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            ArtifactStatus::Failed(_) | ArtifactStatus::Skipped
        )
    }
}

/// Everything a report needs about one run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Directory that was scanned
    pub root: PathBuf,
    /// Where artifacts go
    pub dest_dir: PathBuf,
    /// Artifact kind
    pub link_kind: LinkKind,
    /// Digest used
    pub algorithm: HashAlgorithm,
    /// Whether artifacts were only planned
    pub dry_run: bool,
    /// Duplicate groups, in first-seen order
    pub groups: Vec<DuplicateGroup>,
    /// Scan statistics
    pub summary: ScanSummary,
    /// One record per group member, in plan order
    pub artifacts: Vec<ArtifactRecord>,
    /// Why the destination could not be created, if it could not
    pub destination_error: Option<String>,
    /// Exit code the run ends with
    pub exit_code: ExitCode,
}

impl RunOutcome {
    /// Each group paired with its artifacts, in one pass over `artifacts`.
    ///
    /// Relies on `artifacts` being in plan order; a group with no records
    /// gets an empty slice.
    pub fn groups_with_artifacts(
        &self,
    ) -> impl Iterator<Item = (usize, &DuplicateGroup, &[ArtifactRecord])> + '_ {
        let mut rest = self.artifacts.as_slice();
        self.groups.iter().enumerate().map(move |(i, group)| {
            let group_index = i + 1;
            let len = rest
                .iter()
                .take_while(|a| a.plan.group_index == group_index)
                .count();
            let (records, tail) = rest.split_at(len);
            rest = tail;
            (group_index, group, records)
        })
    }

    /// Number of artifacts that exist after the run.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| matches!(a.status, ArtifactStatus::Created(_)))
            .count()
    }

    /// Number of artifacts that failed or were skipped.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.is_failure()).count()
    }
}
