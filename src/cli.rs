//! Command-line interface definitions for dupelink.
//!
//! # Example
//!
//! ```bash
//! # Prompt for the directory, link duplicates into ./Duplicate_Shortcuts
//! dupelink
//!
//! # Scan a directory and write reference files elsewhere
//! dupelink ~/Pictures --dest ~/dupes --link-kind reference
//!
//! # Only report what would be created, as JSON
//! dupelink ~/Pictures --dry-run --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::links::LinkKind;
use crate::scanner::HashAlgorithm;

/// Find duplicate files and link every copy into one folder.
///
/// Files are compared by a SHA-256 (or BLAKE3) digest of their content.
/// For each group of identical files, one symlink or reference file per copy
/// is created in the destination folder, named
/// `{group}-{member}-{name}{ext}` so the copies sort together.
#[derive(Debug, Parser)]
#[command(name = "dupelink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Folder the artifacts are created in [default: Duplicate_Shortcuts]
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Kind of artifact to create
    #[arg(short, long, value_enum, value_name = "KIND")]
    pub link_kind: Option<LinkKind>,

    /// Content digest used to compare files
    #[arg(short, long, value_enum, value_name = "ALGO")]
    pub algorithm: Option<HashAlgorithm>,

    /// Read buffer size (e.g., 4096, 4KiB, 64KiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB. Must not exceed 64KiB.
    #[arg(long, value_name = "SIZE", value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip zero-byte files
    #[arg(long)]
    pub skip_empty: bool,

    /// Replace artifacts left over from an earlier run
    #[arg(long)]
    pub overwrite: bool,

    /// Report groups and artifact names without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Format of the report printed on stdout
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Settings given explicitly on the command line.
    ///
    /// Boolean switches only override when present, so `--overwrite` can
    /// turn on what a config file left off but never the reverse.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dest_dir: self.dest.clone(),
            link_kind: self.link_kind,
            algorithm: self.algorithm,
            chunk_size: self.chunk_size,
            follow_symlinks: self.follow_symlinks.then_some(true),
            skip_empty: self.skip_empty.then_some(true),
            overwrite: self.overwrite.then_some(true),
        }
    }
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupelink::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

/// [`parse_size`] narrowed to a buffer length.
///
/// The range itself is checked by [`crate::config::Config::validate`] so
/// that values from a config file get the same treatment.
fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    usize::try_from(bytes).map_err(|_| format!("Chunk size too large: {bytes}"))
}
