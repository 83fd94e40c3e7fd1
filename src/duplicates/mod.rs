//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Accumulating file digests during a scan ([`index`])
//! - Duplicate group management ([`groups`])
//! - The walk, hash, group pipeline ([`finder`])

pub mod finder;
pub mod groups;
pub mod index;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::DuplicateGroup;
pub use index::DuplicateIndex;
