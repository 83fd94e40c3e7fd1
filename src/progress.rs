//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to show what the scan is doing: a spinner naming the
//! file currently being hashed, then a bar while artifacts are created.
//! indicatif's `wide_msg` cuts the file name to the terminal width.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Phase name used while walking and hashing.
pub const PHASE_HASHING: &str = "hashing";

/// Phase name used while creating artifacts.
pub const PHASE_LINKING: &str = "linking";

/// Progress callback for the scan pipeline.
///
/// Implement this trait to receive progress updates during
/// hashing and artifact creation.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_HASHING`], [`PHASE_LINKING`])
    /// * `total` - Total number of items, or 0 when unknown up front
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Bar of the running phase and the label its per-item messages use.
struct ActiveBar {
    bar: ProgressBar,
    label: &'static str,
}

/// Progress reporter using indicatif.
pub struct Progress {
    active: Mutex<Option<ActiveBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupelink::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            active: Mutex::new(None),
            quiet,
        }
    }

    /// Style for the hashing phase (spinner, total unknown).
    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} files {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Style for the linking phase (progress bar).
    fn linking_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_active(&self, f: impl FnOnce(&ActiveBar)) {
        let guard = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref active) = *guard {
            f(active);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = if phase == PHASE_HASHING || total == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::hashing_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::linking_style());
            pb
        };
        pb.set_message(format!("{phase}..."));

        let next = ActiveBar {
            bar: pb,
            label: item_label(phase),
        };
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.replace(next) {
            previous.bar.finish_and_clear();
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let name = file_name_for_display(path);
        self.with_active(|active| {
            active.bar.set_position(current as u64);
            active.bar.set_message(format!("{}: {name}", active.label));
        });
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let taken = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(active) = taken {
            active.bar.finish_with_message(format!("{phase} complete"));
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        self.with_active(|active| active.bar.set_message(message.to_string()));
    }
}

/// Label shown before each item of `phase`.
fn item_label(phase: &str) -> &'static str {
    match phase {
        PHASE_HASHING => "Hashing",
        PHASE_LINKING => "Linking",
        _ => "Processing",
    }
}

/// Final path component for display, or the whole path if it has none.
fn file_name_for_display(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned())
}
