//! Layered configuration.
//!
//! Settings are merged from, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file passed with `--config`
//! 3. `DUPELINK_*` environment variables (e.g. `DUPELINK_LINK_KIND=reference`)
//! 4. Command-line flags
//!
//! ```toml
//! dest_dir = "Duplicate_Shortcuts"
//! link_kind = "symlink"
//! algorithm = "blake3"
//! chunk_size = 65536
//! follow_symlinks = false
//! skip_empty = true
//! overwrite = false
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::links::{LinkKind, DEFAULT_DEST_DIR};
use crate::scanner::{HashAlgorithm, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPELINK_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file given with `--config` does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// A provider supplied a value of the wrong shape.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// Chunk size outside `1..=MAX_CHUNK_SIZE`.
    #[error("Chunk size must be between 1 and {MAX_CHUNK_SIZE} bytes, got {0}")]
    ChunkSize(usize),
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where artifacts are created
    pub dest_dir: PathBuf,
    /// What kind of artifact to create
    pub link_kind: LinkKind,
    /// Content digest
    pub algorithm: HashAlgorithm,
    /// Read buffer size in bytes
    pub chunk_size: usize,
    /// Descend into symlinked directories
    pub follow_symlinks: bool,
    /// Ignore zero-byte files
    pub skip_empty: bool,
    /// Replace artifacts left by an earlier run
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            link_kind: LinkKind::default(),
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow_symlinks: false,
            skip_empty: false,
            overwrite: false,
        }
    }
}

/// Values set explicitly on the command line.
///
/// Unset fields are skipped when serialized so they never mask a value from
/// a lower layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_kind: Option<LinkKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<HashAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

impl Config {
    /// Build the layered figment without extracting it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if `config_file` is given but
    /// does not exist.
    pub fn figment(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides)))
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, any layer holds a malformed value, or
    /// the result does not pass [`Config::validate`].
    pub fn load(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let config: Config = Self::figment(config_file, overrides)?
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Check ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChunkSize`] for a chunk size of zero or above
    /// [`MAX_CHUNK_SIZE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSize(self.chunk_size));
        }
        Ok(())
    }
}
