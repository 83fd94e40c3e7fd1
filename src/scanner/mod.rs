//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive, deterministic directory walking using walkdir
//! - Streaming content hashing with SHA-256 or BLAKE3
//! - Root directory validation
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming content hashing
//!
//! # Example
//!
//! ```no_run
//! use dupelink::scanner::{Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default()).unwrap();
//! let hasher = Hasher::new();
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => match hasher.hash(&file.path) {
//!             Ok(digest) => println!("{} {}", dupelink::scanner::digest_to_hex(&digest), file.path.display()),
//!             Err(e) => eprintln!("Warning: {}", e),
//!         },
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{
    digest_to_hex, Digest, HashAlgorithm, Hasher, DEFAULT_CHUNK_SIZE,
    MAX_CHUNK_SIZE,
};
pub use walker::{validate_directory, Walker};

/// A regular file discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, rooted at the scanned directory
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into symlinked directories.
    /// Cycle detection is left to walkdir.
    pub follow_symlinks: bool,

    /// Skip zero-byte files.
    pub skip_empty: bool,

    /// Directories pruned from the walk, together with everything below them.
    pub excluded_dirs: Vec<PathBuf>,
}

impl WalkerConfig {
    /// Set whether symlinked directories are descended.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set whether empty files are skipped.
    #[must_use]
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Add a directory that the walk must not enter.
    #[must_use]
    pub fn with_excluded_dir(mut self, dir: PathBuf) -> Self {
        self.excluded_dirs.push(dir);
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Whether this error rejects the scan root itself.
    ///
    /// Only these errors block a run; everything else concerns a single entry.
    #[must_use]
    pub fn is_invalid_directory(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NotADirectory(_))
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    pub(crate) fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}
