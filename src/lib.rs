//! dupelink - find duplicate files and link every copy into one folder.
//!
//! A directory tree is walked, every regular file is hashed with a streaming
//! 256-bit digest, and files sharing a digest form a duplicate group. For each
//! member of each group a symlink or reference file is created in a
//! destination folder, named so that the copies of one file sort together.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod links;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::links::{emit_links, plan_links, LinkError};
use crate::output::{ArtifactRecord, JsonReport, RunOutcome, TextReport};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{validate_directory, WalkerConfig};

/// Run the application with parsed CLI arguments.
///
/// # Errors
///
/// Fails on invalid configuration, an invalid directory given on the command
/// line, an aborted prompt, or a report that cannot be written. Per-file and
/// per-artifact failures are not errors; they end in
/// [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    log::debug!("Log level: {}", logging::current_level_name());

    let config = Config::load(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;

    let root = match &cli.path {
        Some(path) => validate_directory(path)
            .with_context(|| format!("Cannot scan {}", path.display()))?,
        None => {
            let stdin = io::stdin();
            prompt::prompt_for_directory(stdin.lock(), io::stderr())?
        }
    };

    let progress: Arc<dyn ProgressCallback> =
        Arc::new(Progress::new(cli.quiet || cli.no_progress));
    let outcome = scan_and_link(&root, &config, cli.dry_run, Some(progress))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            let color = !cli.no_color && stdout.is_terminal();
            TextReport::new(&outcome, color)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonReport::new(&outcome)
                .write_to(&mut out, true)
                .context("Failed to write report")?;
        }
    }
    out.flush().context("Failed to write report")?;

    Ok(outcome.exit_code)
}

/// Scan `root` and create (or, with `dry_run`, plan) the artifacts.
///
/// The destination directory is never scanned.
///
/// # Errors
///
/// Fails only if `root` is not a directory.
pub fn scan_and_link(
    root: &Path,
    config: &Config,
    dry_run: bool,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<RunOutcome> {
    let walker_config = WalkerConfig::default()
        .with_follow_symlinks(config.follow_symlinks)
        .with_skip_empty(config.skip_empty)
        .with_excluded_dir(config.dest_dir.clone());

    let mut finder_config = FinderConfig::default()
        .with_walker_config(walker_config)
        .with_algorithm(config.algorithm)
        .with_chunk_size(config.chunk_size);
    if let Some(progress) = &progress {
        finder_config = finder_config.with_progress_callback(progress.clone());
    }

    let (groups, summary) = DuplicateFinder::new(finder_config)
        .find_duplicates(root)
        .with_context(|| format!("Cannot scan {}", root.display()))?;

    let mut destination_error = None;
    let artifacts = if dry_run {
        ArtifactRecord::planned(plan_links(&groups))
    } else {
        let emitter = config.link_kind.emitter(config.overwrite);
        match emit_links(
            &groups,
            &config.dest_dir,
            emitter.as_ref(),
            progress.as_deref(),
        ) {
            Ok(emitted) => ArtifactRecord::from_emit(emitted),
            Err(e @ LinkError::Destination { .. }) => {
                log::error!("{}", e);
                destination_error = Some(e.to_string());
                ArtifactRecord::skipped(plan_links(&groups))
            }
            Err(e) => return Err(e).context("Failed to create artifacts"),
        }
    };

    let had_failures = summary.has_errors() || artifacts.iter().any(ArtifactRecord::is_failure);
    let exit_code = ExitCode::for_outcome(groups.len(), had_failures);

    Ok(RunOutcome {
        root: PathBuf::from(root),
        dest_dir: config.dest_dir.clone(),
        link_kind: config.link_kind,
        algorithm: config.algorithm,
        dry_run,
        groups,
        summary,
        artifacts,
        destination_error,
        exit_code,
    })
}
