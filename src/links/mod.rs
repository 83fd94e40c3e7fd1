//! Link artifacts for duplicate groups.
//!
//! This module provides functionality for:
//! - Naming one artifact per duplicate file ([`naming`])
//! - Creating the artifacts as symlinks or reference files ([`emitter`])
//! - Driving both over a whole scan result ([`emit_links`])
//!
//! # Example
//!
//! ```no_run
//! use dupelink::duplicates::DuplicateFinder;
//! use dupelink::links::{emit_links, LinkKind};
//! use std::path::Path;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let emitter = LinkKind::Symlink.emitter(false);
//! let summary = emit_links(&groups, Path::new("Duplicate_Shortcuts"), emitter.as_ref(), None).unwrap();
//! println!("{} artifacts created", summary.created.len());
//! ```

pub mod emitter;
pub mod naming;

use std::path::{Path, PathBuf};

pub use emitter::{
    ensure_destination, LinkEmitter, LinkError, LinkKind, ReferenceFileEmitter, SymlinkEmitter,
    REFERENCE_EXTENSION,
};
pub use naming::{
    artifact_name, exceeds_ordered_range, sanitize_stem, split_extension,
    NamingCounters, MAX_ORDERED_GROUPS, MAX_ORDERED_MEMBERS, MAX_STEM_CHARS,
};

use crate::duplicates::DuplicateGroup;
use crate::progress::{ProgressCallback, PHASE_LINKING};

/// Default destination folder, relative to the working directory.
pub const DEFAULT_DEST_DIR: &str = "Duplicate_Shortcuts";

/// One artifact to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    /// 1-based group counter
    pub group_index: usize,
    /// 1-based position within the group
    pub member_index: usize,
    /// The duplicate file the artifact leads to
    pub source: PathBuf,
    /// Artifact name, before any emitter-specific suffix
    pub name: String,
}

/// An artifact that was created.
#[derive(Debug, Clone)]
pub struct EmittedArtifact {
    /// What was planned
    pub plan: PlannedArtifact,
    /// Where the artifact ended up
    pub path: PathBuf,
}

/// An artifact that could not be created.
#[derive(Debug)]
pub struct LinkFailure {
    /// What was planned
    pub plan: PlannedArtifact,
    /// Why it failed
    pub error: LinkError,
}

/// Outcome of creating the artifacts for a scan.
#[derive(Debug, Default)]
pub struct EmitSummary {
    /// Artifacts created, in plan order
    pub created: Vec<EmittedArtifact>,
    /// Artifacts that failed, in plan order
    pub failures: Vec<LinkFailure>,
}

impl EmitSummary {
    /// Whether every planned artifact was created.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Name every member of every group, without touching the filesystem.
///
/// Groups are numbered in the order given; members in discovery order.
#[must_use]
pub fn plan_links(groups: &[DuplicateGroup]) -> Vec<PlannedArtifact> {
    let mut counters = NamingCounters::new();
    let mut plans = Vec::with_capacity(groups.iter().map(DuplicateGroup::len).sum());

    for group in groups {
        let group_index = counters.next_group();
        for file in &group.files {
            let member_index = counters.next_member();
            plans.push(PlannedArtifact {
                group_index,
                member_index,
                source: file.path.clone(),
                name: artifact_name(&file.path, group_index, member_index),
            });
        }
    }

    plans
}

/// Create one artifact per duplicate file in `dest_dir`.
///
/// The destination is created on demand. A failed artifact is logged and
/// recorded; the remaining artifacts are still attempted.
///
/// # Errors
///
/// Returns [`LinkError::Destination`] if the destination directory cannot be
/// created. No artifact is attempted in that case.
pub fn emit_links(
    groups: &[DuplicateGroup],
    dest_dir: &Path,
    emitter: &dyn LinkEmitter,
    progress: Option<&dyn ProgressCallback>,
) -> Result<EmitSummary, LinkError> {
    let plans = plan_links(groups);
    let mut summary = EmitSummary::default();
    if plans.is_empty() {
        return Ok(summary);
    }

    ensure_destination(dest_dir)?;
    if exceeds_ordered_range(groups) {
        log::warn!(
            "More than {} groups or {} copies in one group: counters widen and artifact names no longer sort in order",
            MAX_ORDERED_GROUPS,
            MAX_ORDERED_MEMBERS
        );
    }

    if let Some(cb) = progress {
        cb.on_phase_start(PHASE_LINKING, plans.len());
    }

    for (i, plan) in plans.into_iter().enumerate() {
        if let Some(cb) = progress {
            cb.on_progress(i + 1, &plan.name);
        }

        match emitter.create_reference(&plan.source, dest_dir, &plan.name) {
            Ok(path) => summary.created.push(EmittedArtifact { plan, path }),
            Err(error) => {
                log::warn!(
                    "Could not create {} artifact for {}: {}",
                    emitter.kind(),
                    plan.source.display(),
                    error
                );
                summary.failures.push(LinkFailure { plan, error });
            }
        }
    }

    if let Some(cb) = progress {
        cb.on_phase_end(PHASE_LINKING);
    }

    log::info!(
        "Created {} {} artifacts in {}",
        summary.created.len(),
        emitter.kind(),
        dest_dir.display()
    );
    Ok(summary)
}
