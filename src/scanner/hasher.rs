//! Streaming file hasher.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing 256-bit content
//! digests of files. Files are read in fixed-size chunks and fed into an
//! incremental hash state, so memory use stays at one chunk no matter how
//! large the file is.
//!
//! # Example
//!
//! ```no_run
//! use dupelink::scanner::{digest_to_hex, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new().with_algorithm(HashAlgorithm::Blake3);
//! let digest = hasher.hash(Path::new("file.bin")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::HashError;

/// 256-bit content digest.
pub type Digest = [u8; 32];

/// Default read size, matching the 4 KiB blocks of the reference tool.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest accepted read size.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024;

/// Hash function used for content digests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3 (256-bit output)
    Blake3,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

/// Incremental hash state for either algorithm.
enum HashState {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl HashState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Sha256(h) => {
                let mut digest = [0u8; 32];
                digest.copy_from_slice(&h.finalize());
                digest
            }
            Self::Blake3(h) => *h.finalize().as_bytes(),
        }
    }
}

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a SHA-256 hasher reading 4 KiB at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Select the hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read size, clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The configured read size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Hash the full content of the file at `path`.
    ///
    /// The file is closed before this returns, whether hashing succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails.
    pub fn hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path.to_path_buf(), e))
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than [`ErrorKind::Interrupted`].
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Digest> {
        let mut state = HashState::new(self.algorithm);
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(state.finalize())
    }

    /// Hash an in-memory byte slice with the configured algorithm.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> Digest {
        let mut state = HashState::new(self.algorithm);
        state.update(data);
        state.finalize()
    }
}

/// Render a digest as 64 lowercase hex characters.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
