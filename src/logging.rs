//! Logging setup.
//!
//! Uses the `log` facade with the `env_logger` backend. The level comes from
//! (highest priority first):
//!
//! 1. `RUST_LOG`, if set
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Info by default
//!
//! Log lines go to stderr so the report on stdout stays clean for `--output json`.
//!
//! ```rust,no_run
//! use dupelink::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging from the CLI verbosity flags.
///
/// Call once, before any log macro. A second call is ignored with a debug
/// message rather than panicking, so tests that drive `run_app` repeatedly
/// in one process keep working.
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!(
            "Logging initialized at level: {:?}",
            determine_level(verbose, quiet)
        );
    }
}

/// Map the CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Debug builds get timestamps, plus the module path with `-v`.
/// Release builds print level and message only.
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}

/// Name of the active maximum log level.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
