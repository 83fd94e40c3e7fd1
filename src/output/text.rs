//! Human-readable report.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Condition, Paint};

use super::{ArtifactStatus, RunOutcome};

/// Plain-text rendering of a [`RunOutcome`].
#[derive(Debug)]
pub struct TextReport<'a> {
    outcome: &'a RunOutcome,
    color: bool,
}

impl<'a> TextReport<'a> {
    /// Create a report; `color` enables ANSI styling.
    #[must_use]
    pub fn new(outcome: &'a RunOutcome, color: bool) -> Self {
        Self { outcome, color }
    }

    fn style(&self) -> Condition {
        if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let outcome = self.outcome;

        if outcome.groups.is_empty() {
            writeln!(
                writer,
                "{}",
                format!("No duplicate files found in {}", outcome.root.display())
                    .green()
                    .whenever(self.style())
            )?;
        }

        for (group_index, group, records) in outcome.groups_with_artifacts() {
            writeln!(
                writer,
                "{} {} ({} files, {} each)",
                format!("Group {group_index}:").bold().whenever(self.style()),
                group.hash_hex().dim().whenever(self.style()),
                group.len(),
                ByteSize::b(group.size())
            )?;

            for record in records {
                write!(
                    writer,
                    "  {} -> {}",
                    record.plan.source.display(),
                    record.plan.name
                )?;
                match &record.status {
                    ArtifactStatus::Created(_) | ArtifactStatus::Planned => writeln!(writer)?,
                    ArtifactStatus::Failed(reason) => writeln!(
                        writer,
                        " {}",
                        format!("[failed: {reason}]").red().whenever(self.style())
                    )?,
                    ArtifactStatus::Skipped => writeln!(
                        writer,
                        " {}",
                        "[skipped]".yellow().whenever(self.style())
                    )?,
                }
            }
            writeln!(writer)?;
        }

        self.write_summary(writer)
    }

    fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let outcome = self.outcome;
        let summary = &outcome.summary;

        writeln!(writer, "{}", "Summary".bold().whenever(self.style()))?;
        writeln!(
            writer,
            "  Files scanned:     {} ({}, {})",
            summary.total_files,
            summary.total_size_display(),
            outcome.algorithm
        )?;
        if summary.has_errors() {
            writeln!(
                writer,
                "  Skipped:           {}",
                format!(
                    "{} unreadable files, {} walk errors",
                    summary.failed_files,
                    summary.scan_errors.len()
                )
                .yellow()
                .whenever(self.style())
            )?;
        }
        writeln!(writer, "  Duplicate groups:  {}", summary.duplicate_groups)?;
        writeln!(
            writer,
            "  Redundant copies:  {} ({} reclaimable)",
            summary.duplicate_files,
            summary.reclaimable_display()
        )?;

        if let Some(reason) = &outcome.destination_error {
            writeln!(
                writer,
                "  Artifacts:         {}",
                format!("none created: {reason}").red().whenever(self.style())
            )?;
        } else if outcome.dry_run {
            writeln!(
                writer,
                "  Artifacts:         {} would be created in {} (dry run)",
                outcome.artifacts.len(),
                outcome.dest_dir.display()
            )?;
        } else if !outcome.artifacts.is_empty() {
            let failed = outcome.failed_count();
            let failed_text = format!("{failed} failed");
            writeln!(
                writer,
                "  Artifacts:         {} created in {} ({}, {})",
                outcome.created_count(),
                outcome.dest_dir.display(),
                outcome.link_kind,
                if failed > 0 {
                    failed_text.red().whenever(self.style())
                } else {
                    failed_text.green().whenever(self.style())
                }
            )?;
        }

        writeln!(
            writer,
            "  Duration:          {:.2}s",
            summary.scan_duration.as_secs_f64()
        )
    }
}
