//! Duplicate finder: walk, hash, group.
//!
//! # Overview
//!
//! This module drives one scan of a directory tree:
//! 1. **Walk** - [`Walker`] yields every regular file below the root
//! 2. **Hash** - [`Hasher`] streams each file into a 256-bit digest
//! 3. **Group** - [`DuplicateIndex`] collects digests and, once the walk is
//!    over, reports every digest shared by two or more files
//!
//! Everything runs on the calling thread, one file at a time. A file that
//! cannot be read is logged, counted and left out; the scan goes on.
//!
//! # Example
//!
//! ```no_run
//! use dupelink::duplicates::{DuplicateFinder, FinderConfig};
//! use dupelink::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_algorithm(HashAlgorithm::Blake3);
//! let finder = DuplicateFinder::new(config);
//!
//! let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
//! println!("Found {} duplicate groups", summary.duplicate_groups);
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::{DuplicateGroup, DuplicateIndex};
use crate::progress::{ProgressCallback, PHASE_HASHING};
use crate::scanner::{HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Configuration for a duplicate scan.
#[derive(Clone)]
pub struct FinderConfig {
    /// Directory walking options
    pub walker_config: WalkerConfig,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Read size used while hashing
    pub chunk_size: usize,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            algorithm: HashAlgorithm::default(),
            chunk_size: crate::scanner::DEFAULT_CHUNK_SIZE,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read size used while hashing.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Regular files discovered by the walk
    pub total_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be hashed and were left out
    pub failed_files: usize,
    /// Bytes of content hashed
    pub total_size: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (each group minus one file)
    pub duplicate_files: usize,
    /// Space taken by the redundant copies
    pub reclaimable_space: u64,
    /// Duration of the walk and hashing
    pub scan_duration: Duration,
    /// Entries the walk could not inspect
    pub scan_errors: Vec<ScanError>,
    /// Files the hasher could not read
    pub hash_errors: Vec<HashError>,
}

impl ScanSummary {
    /// Whether any file or directory was skipped because of an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || !self.hash_errors.is_empty()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format hashed bytes as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }

    /// Fill in the group-derived fields.
    fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
    }
}

/// Errors that stop a scan before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan root is missing, not a directory, or unreadable.
    #[error("Invalid directory: {0}")]
    InvalidDirectory(#[source] ScanError),
}

/// Duplicate finder that runs the walk, hash, group pipeline.
///
/// # Example
///
/// ```no_run
/// use dupelink::duplicates::DuplicateFinder;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((groups, summary)) => {
///         println!("Found {} duplicate groups", groups.len());
///         println!("Can reclaim {}", summary.reclaimable_display());
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new()
            .with_algorithm(config.algorithm)
            .with_chunk_size(config.chunk_size);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files below `path`.
    ///
    /// # Returns
    ///
    /// - `Vec<DuplicateGroup>` - Groups in the order their content was first seen
    /// - `ScanSummary` - Statistics and the per-file errors that were skipped
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidDirectory`] if `path` is not an existing
    /// directory. Nothing is walked in that case.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let walker = Walker::new(path, self.config.walker_config.clone())
            .map_err(FinderError::InvalidDirectory)?;

        let mut index = DuplicateIndex::new();
        let mut summary = ScanSummary::default();
        self.record_tree(&walker, &mut index, &mut summary);

        let groups = index.finalize();
        summary.record_groups(&groups);
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scanned {} files ({}), found {} duplicate groups",
            summary.total_files,
            summary.total_size_display(),
            summary.duplicate_groups
        );

        Ok((groups, summary))
    }

    /// Hash every file the walker yields into `index`.
    ///
    /// Walk and hash failures are logged, counted in `summary`, and skipped.
    pub fn record_tree(
        &self,
        walker: &Walker,
        index: &mut DuplicateIndex,
        summary: &mut ScanSummary,
    ) {
        log::debug!(
            "Scanning {} with {} ({} byte chunks)",
            walker.root().display(),
            self.hasher.algorithm(),
            self.hasher.chunk_size()
        );
        let progress = self.config.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_HASHING, 0);
        }

        for entry in walker.walk() {
            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    summary.scan_errors.push(e);
                    continue;
                }
            };

            summary.total_files += 1;
            if let Some(cb) = progress {
                cb.on_progress(summary.total_files, &file.path.to_string_lossy());
            }
            log::trace!("Hashing {}", file.path.display());

            match self.hasher.hash(&file.path) {
                Ok(digest) => {
                    summary.hashed_files += 1;
                    summary.total_size += file.size;
                    index.record(file, digest);
                }
                Err(e) => {
                    log::warn!("Skipping unreadable file: {}", e);
                    if let Some(cb) = progress {
                        cb.on_message(&format!("skipped {}", file.path.display()));
                    }
                    summary.failed_files += 1;
                    summary.hash_errors.push(e);
                }
            }
        }

        if let Some(cb) = progress {
            cb.on_phase_end(PHASE_HASHING);
        }
    }
}
