//! Digest-keyed accumulation of scanned files.
//!
//! # Overview
//!
//! [`DuplicateIndex`] collects `(FileEntry, Digest)` pairs while a tree is
//! walked and, once the walk is over, partitions them into
//! [`DuplicateGroup`]s. A duplicate can turn up anywhere in traversal order,
//! so no group is reported until [`DuplicateIndex::finalize`] runs.
//!
//! The index is an ordinary value owned by whoever drives the scan; two scans
//! never share state.
//!
//! # Example
//!
//! ```
//! use dupelink::duplicates::DuplicateIndex;
//! use dupelink::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let mut index = DuplicateIndex::new();
//! index.record(FileEntry::new(PathBuf::from("a.txt"), 3), [1; 32]);
//! index.record(FileEntry::new(PathBuf::from("b.txt"), 3), [2; 32]);
//! index.record(FileEntry::new(PathBuf::from("c.txt"), 3), [1; 32]);
//!
//! let groups = index.finalize();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].files.len(), 2);
//! ```

use std::collections::HashMap;

use super::DuplicateGroup;
use crate::scanner::{Digest, FileEntry};

/// Mapping from digest to the files that produced it.
///
/// Digests keep the order in which they were first recorded; files keep the
/// order in which they were recorded under their digest.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    /// Digest -> position in `buckets`
    positions: HashMap<Digest, usize>,
    /// Buckets in first-seen order
    buckets: Vec<(Digest, Vec<FileEntry>)>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` under `digest`, creating the bucket if needed.
    pub fn record(&mut self, entry: FileEntry, digest: Digest) {
        match self.positions.get(&digest) {
            Some(&pos) => self.buckets[pos].1.push(entry),
            None => {
                self.positions.insert(digest, self.buckets.len());
                self.buckets.push((digest, vec![entry]));
            }
        }
    }

    /// Number of distinct digests recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of entries recorded across all digests.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.buckets.iter().map(|(_, files)| files.len()).sum()
    }

    /// Partition the recorded entries into duplicate groups.
    ///
    /// Only digests with more than one entry produce a group. Groups come out
    /// in the order their digest was first recorded.
    #[must_use]
    pub fn finalize(self) -> Vec<DuplicateGroup> {
        self.buckets
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(digest, files)| DuplicateGroup::new(digest, files))
            .collect()
    }
}
