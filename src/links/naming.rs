//! Artifact names for duplicate files.
//!
//! Every artifact is named `{group:05}-{member:03}-{stem}{extension}`: the
//! counter prefix keeps names unique and sorts members of one group together
//! in discovery order, while the sanitized stem keeps them readable.
//!
//! ```
//! use dupelink::links::artifact_name;
//! use std::path::Path;
//!
//! assert_eq!(
//!     artifact_name(Path::new("/data/My File!!@@.txt"), 1, 2),
//!     "00001-002-My File.txt"
//! );
//! ```

use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::duplicates::DuplicateGroup;

/// Largest group counter that still sorts lexicographically.
///
/// Larger counters are written in full, widening the field.
pub const MAX_ORDERED_GROUPS: usize = 99_999;

/// Largest member counter that still sorts lexicographically.
pub const MAX_ORDERED_MEMBERS: usize = 999;

/// Longest sanitized stem, in characters.
pub const MAX_STEM_CHARS: usize = 50;

/// Derive the artifact name for one member of one group.
///
/// Pure and total: any path produces a name, possibly with an empty stem.
#[must_use]
pub fn artifact_name(original: &Path, group_index: usize, member_index: usize) -> String {
    let file_name = original
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let (stem, extension) = split_extension(&file_name);

    // Width is a minimum: counters past the caps widen instead of wrapping.
    format!(
        "{group_index:05}-{member_index:03}-{}{extension}",
        sanitize_stem(stem)
    )
}

/// Split a file name at its last `.`.
///
/// The extension keeps its dot. Leading dots belong to the stem, so
/// `.bashrc` has no extension, while `archive.` has the extension `"."`.
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();

    match file_name[leading_dots..].rfind('.') {
        Some(pos) => file_name.split_at(leading_dots + pos),
        None => (file_name, ""),
    }
}

/// Reduce a stem to alphanumerics and whitespace, trimmed and cut to
/// [`MAX_STEM_CHARS`] characters.
///
/// The stem is NFC-normalized first so decomposed accents survive as letters.
#[must_use]
pub fn sanitize_stem(stem: &str) -> String {
    let kept: String = stem
        .nfc()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    kept.trim().chars().take(MAX_STEM_CHARS).collect()
}

/// Counters for naming a run of groups.
///
/// `group_index` counts groups from 1; `member_index` counts members from 1
/// and restarts with every group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingCounters {
    /// Current group, 0 before the first group
    pub group_index: usize,
    /// Current member within the group, 0 before the first member
    pub member_index: usize,
}

impl NamingCounters {
    /// Counters positioned before the first group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next group and return its index.
    pub fn next_group(&mut self) -> usize {
        self.group_index += 1;
        self.member_index = 0;
        self.group_index
    }

    /// Advance to the next member of the current group and return its index.
    pub fn next_member(&mut self) -> usize {
        self.member_index += 1;
        self.member_index
    }
}

/// Whether naming `groups` needs counters wider than the padded fields.
#[must_use]
pub fn exceeds_ordered_range(groups: &[DuplicateGroup]) -> bool {
    groups.len() > MAX_ORDERED_GROUPS || groups.iter().any(|g| g.len() > MAX_ORDERED_MEMBERS)
}
