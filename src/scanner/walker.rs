//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and yielding every regular file below it. Traversal is single-threaded and
//! entries are sorted by file name within each directory, so the order is
//! stable for a filesystem that does not change between runs.
//!
//! # Features
//!
//! - Root validation before any traversal ([`validate_directory`])
//! - Symlinks that resolve to regular files are reported as files
//! - Optional descent into symlinked directories (walkdir detects loops)
//! - Pruning of excluded directories, such as the artifact destination
//! - Per-entry errors are yielded instead of stopping the walk
//!
//! # Example
//!
//! ```no_run
//! use dupelink::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default()).unwrap();
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Check that `path` names an existing directory.
///
/// This is the only validation the scanner performs. It touches the
/// filesystem but has no side effects, so the interactive prompt can call it
/// repeatedly.
///
/// # Errors
///
/// - [`ScanError::NotFound`] if the path is empty or does not exist
/// - [`ScanError::NotADirectory`] if it exists but is not a directory
/// - [`ScanError::PermissionDenied`] / [`ScanError::Io`] if it cannot be inspected
pub fn validate_directory(path: &Path) -> Result<PathBuf, ScanError> {
    if path.as_os_str().is_empty() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(path.to_path_buf()),
        Ok(_) => Err(ScanError::NotADirectory(path.to_path_buf())),
        Err(e) => Err(match e.kind() {
            ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }),
    }
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given directory.
    ///
    /// # Errors
    ///
    /// Fails with the error from [`validate_directory`] if `path` is not an
    /// existing directory. No traversal happens in that case.
    pub fn new(path: &Path, config: WalkerConfig) -> Result<Self, ScanError> {
        let root = validate_directory(path)?;
        Ok(Self { root, config })
    }

    /// The validated root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Each call starts a fresh traversal. Errors are yielded as
    /// [`ScanError`] values rather than stopping iteration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupelink::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default()).unwrap();
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let excluded = self.canonical_excluded_dirs();

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !is_excluded(entry, &excluded))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => self.handle_walkdir_error(e),
            })
    }

    /// Resolve excluded directories once per walk.
    ///
    /// Directories that do not exist yet cannot contain anything to skip.
    fn canonical_excluded_dirs(&self) -> Vec<PathBuf> {
        self.config
            .excluded_dirs
            .iter()
            .filter_map(|dir| fs::canonicalize(dir).ok())
            .collect()
    }

    /// Turn a walkdir entry into a FileEntry if it is a regular file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();
        let path = entry.path();

        if file_type.is_dir() {
            return None;
        }

        let metadata = if file_type.is_symlink() {
            // Only reachable when links are not followed: resolve the target
            // ourselves so file symlinks still count as files.
            match fs::metadata(path) {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::trace!("Skipping broken symlink: {}", path.display());
                    return None;
                }
                Err(e) => return Some(Err(self.handle_io_error(path, e))),
            }
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    let error = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                    return Some(Err(self.handle_io_error(path, error)));
                }
            }
        } else {
            log::trace!("Skipping special file: {}", path.display());
            return None;
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-file symlink: {}", path.display());
            return None;
        }

        let size = metadata.len();
        if size == 0 && self.config.skip_empty {
            log::debug!("Skipping empty file: {}", path.display());
            return None;
        }

        Some(Ok(FileEntry::new(path.to_path_buf(), size)))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                }
            }
        }
    }

    /// Handle walkdir errors.
    ///
    /// Symlink loops and dangling links met while following links are not
    /// files, so they are skipped rather than reported.
    fn handle_walkdir_error(&self, error: walkdir::Error) -> Option<Result<FileEntry, ScanError>> {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::debug!(
                "Skipping symlink loop: {} -> {}",
                path.display(),
                ancestor.display()
            );
            return None;
        }

        let is_dangling_link = fs::symlink_metadata(&path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
            && fs::metadata(&path).is_err();
        if is_dangling_link {
            log::trace!("Skipping broken symlink: {}", path.display());
            return None;
        }

        let io_error = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("directory traversal failed"));
        Some(Err(self.handle_io_error(&path, io_error)))
    }
}

/// Whether `entry` is a directory that must not be entered.
fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() || entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    match fs::canonicalize(entry.path()) {
        Ok(canonical) => {
            let skip = excluded.iter().any(|dir| *dir == canonical);
            if skip {
                log::debug!("Skipping excluded directory: {}", entry.path().display());
            }
            skip
        }
        Err(_) => false,
    }
}
