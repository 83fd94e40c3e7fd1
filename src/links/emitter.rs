//! Link artifact emitters.
//!
//! A [`LinkEmitter`] turns `(target, destination, name)` into a filesystem
//! object that leads back to `target`. Two implementations are provided:
//!
//! - [`SymlinkEmitter`]: a symbolic link named `name`
//! - [`ReferenceFileEmitter`]: a text file named `name.ref` holding the
//!   absolute target path, usable on any platform
//!
//! Targets are made absolute (without resolving symlinks) so artifacts keep
//! working regardless of the directory they are opened from.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extension appended by [`ReferenceFileEmitter`].
pub const REFERENCE_EXTENSION: &str = "ref";

/// Kind of artifact to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Symbolic link to the original file
    Symlink,
    /// Plain text file containing the original path
    Reference,
}

impl Default for LinkKind {
    fn default() -> Self {
        if cfg!(unix) {
            Self::Symlink
        } else {
            Self::Reference
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Symlink => write!(f, "symlink"),
            LinkKind::Reference => write!(f, "reference"),
        }
    }
}

impl LinkKind {
    /// Build the emitter for this kind.
    ///
    /// # Arguments
    ///
    /// * `overwrite` - Replace artifacts that already exist instead of failing
    #[must_use]
    pub fn emitter(self, overwrite: bool) -> Box<dyn LinkEmitter> {
        match self {
            LinkKind::Symlink => Box::new(SymlinkEmitter::new(overwrite)),
            LinkKind::Reference => Box::new(ReferenceFileEmitter::new(overwrite)),
        }
    }
}

/// Errors that can occur while creating artifacts.
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    /// Something already exists where the artifact should go.
    #[error("Artifact already exists: {0}")]
    AlreadyExists(PathBuf),

    /// The destination directory could not be created.
    #[error("Cannot create destination directory {path}: {source}")]
    Destination {
        /// Destination directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be written.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Artifact path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// This platform cannot create this kind of artifact.
    #[error("{0} artifacts are not supported on this platform")]
    Unsupported(LinkKind),
}

impl LinkError {
    fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        if error.kind() == ErrorKind::AlreadyExists {
            Self::AlreadyExists(path)
        } else {
            Self::Io {
                path,
                source: error,
            }
        }
    }
}

/// Creates a navigable reference to a file.
pub trait LinkEmitter {
    /// Create an artifact named after `name` in `dest_dir` leading to `target`.
    ///
    /// Returns the path of the created artifact.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] if the artifact cannot be created.
    fn create_reference(&self, target: &Path, dest_dir: &Path, name: &str)
        -> Result<PathBuf, LinkError>;

    /// The kind of artifact this emitter creates.
    fn kind(&self) -> LinkKind;
}

/// Create `dest_dir` (and its parents) if it does not exist.
///
/// # Errors
///
/// Returns [`LinkError::Destination`] if the directory cannot be created or
/// the path exists but is not a directory.
pub fn ensure_destination(dest_dir: &Path) -> Result<(), LinkError> {
    fs::create_dir_all(dest_dir).map_err(|source| LinkError::Destination {
        path: dest_dir.to_path_buf(),
        source,
    })?;
    log::debug!("Destination directory ready: {}", dest_dir.display());
    Ok(())
}

/// Absolute form of `target`, without following symlinks.
fn absolute_target(target: &Path) -> Result<PathBuf, LinkError> {
    std::path::absolute(target).map_err(|source| LinkError::Io {
        path: target.to_path_buf(),
        source,
    })
}

/// Remove whatever non-directory entry sits at `artifact`.
///
/// Directories are never removed; they surface as `AlreadyExists`.
fn clear_existing(artifact: &Path, overwrite: bool) -> Result<(), LinkError> {
    match fs::symlink_metadata(artifact) {
        Ok(metadata) => {
            if !overwrite || metadata.is_dir() {
                return Err(LinkError::AlreadyExists(artifact.to_path_buf()));
            }
            log::debug!("Replacing existing artifact: {}", artifact.display());
            fs::remove_file(artifact).map_err(|e| LinkError::from_io(artifact.to_path_buf(), e))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LinkError::from_io(artifact.to_path_buf(), e)),
    }
}

/// Raw bytes of `target` followed by a newline.
///
/// Unix paths are written byte for byte. Elsewhere a path that is not valid
/// Unicode is refused rather than stored lossily.
fn reference_contents(target: &Path) -> Result<Vec<u8>, LinkError> {
    let bytes: &[u8] = {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            target.as_os_str().as_bytes()
        }
        #[cfg(not(unix))]
        {
            let text = target.to_str().ok_or_else(|| LinkError::Io {
                path: target.to_path_buf(),
                source: io::Error::new(ErrorKind::InvalidData, "path is not valid Unicode"),
            })?;
            text.as_bytes()
        }
    };

    let mut contents = Vec::with_capacity(bytes.len() + 1);
    contents.extend_from_slice(bytes);
    contents.push(b'\n');
    Ok(contents)
}

/// Create `artifact` exclusively and run `fill` on it.
///
/// A file left incomplete by a failed `fill` is removed again.
fn create_filled<F>(artifact: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(artifact)?;

    if let Err(e) = fill(&mut file).and_then(|()| file.flush()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(artifact) {
            log::warn!(
                "Failed to remove incomplete artifact {}: {}",
                artifact.display(),
                remove_err
            );
        }
        return Err(e);
    }
    Ok(())
}

/// Emits symbolic links.
#[derive(Debug, Clone, Default)]
pub struct SymlinkEmitter {
    overwrite: bool,
}

impl SymlinkEmitter {
    /// Create a symlink emitter.
    #[must_use]
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

impl LinkEmitter for SymlinkEmitter {
    fn create_reference(
        &self,
        target: &Path,
        dest_dir: &Path,
        name: &str,
    ) -> Result<PathBuf, LinkError> {
        let target = absolute_target(target)?;
        let artifact = dest_dir.join(name);
        clear_existing(&artifact, self.overwrite)?;

        #[cfg(unix)]
        std::os::unix::fs::symlink(&target, &artifact)
            .map_err(|e| LinkError::from_io(artifact.clone(), e))?;
        #[cfg(windows)]
        std::os::windows::fs::symlink_file(&target, &artifact)
            .map_err(|e| LinkError::from_io(artifact.clone(), e))?;
        #[cfg(not(any(unix, windows)))]
        return Err(LinkError::Unsupported(LinkKind::Symlink));

        log::trace!("{} -> {}", artifact.display(), target.display());
        Ok(artifact)
    }

    fn kind(&self) -> LinkKind {
        LinkKind::Symlink
    }
}

/// Emits `.ref` text files containing the absolute target path.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFileEmitter {
    overwrite: bool,
}

impl ReferenceFileEmitter {
    /// Create a reference-file emitter.
    #[must_use]
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

impl LinkEmitter for ReferenceFileEmitter {
    fn create_reference(
        &self,
        target: &Path,
        dest_dir: &Path,
        name: &str,
    ) -> Result<PathBuf, LinkError> {
        let target = absolute_target(target)?;
        let artifact = dest_dir.join(format!("{name}.{REFERENCE_EXTENSION}"));
        clear_existing(&artifact, self.overwrite)?;

        let contents = reference_contents(&target)?;
        create_filled(&artifact, |file| file.write_all(&contents))
            .map_err(|e| LinkError::from_io(artifact.clone(), e))?;

        log::trace!("{} -> {}", artifact.display(), target.display());
        Ok(artifact)
    }

    fn kind(&self) -> LinkKind {
        LinkKind::Reference
    }
}
