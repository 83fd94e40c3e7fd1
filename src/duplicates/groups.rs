//! Confirmed duplicate groups.
//!
//! A [`DuplicateGroup`] is a digest plus every file that hashed to it, in the
//! order the files were discovered. Groups are only produced by
//! [`DuplicateIndex::finalize`](super::DuplicateIndex::finalize), which never
//! emits a group with fewer than two members.

use std::path::PathBuf;

use crate::scanner::{digest_to_hex, Digest, FileEntry};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every file in the group
    pub hash: Digest,
    /// Files with this digest, in discovery order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if fewer than two files are given.
    #[must_use]
    pub fn new(hash: Digest, files: Vec<FileEntry>) -> Self {
        debug_assert!(
            files.len() > 1,
            "duplicate group needs at least two files, got {}",
            files.len()
        );
        Self { hash, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Size of one copy of the content.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.files.first().map_or(0, |f| f.size)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space taken by the redundant copies (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.total_size().saturating_sub(self.size())
    }

    /// Number of redundant copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        digest_to_hex(&self.hash)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}
