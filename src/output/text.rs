//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Resolved packages with their chosen version
//! - Unresolved packages with the conflict and every contributing declaration
//! - Cross-ecosystem ambiguity notices
//! - Per-ecosystem analysis errors
//! - Summary with a per-ecosystem breakdown

use crate::domain::{Conflict, ConflictReason, DependencyRecord, Resolution, ResolvedPackage};
use crate::engine::{AnalysisReport, ReportSummary};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn heading(&self, title: &str, count: usize, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{} ({})", title.bold(), count)
        } else {
            writeln!(writer, "{} ({})", title, count)
        }
    }

    /// Calculate the maximum package name length for alignment
    fn max_name_length<'a>(&self, packages: impl Iterator<Item = &'a ResolvedPackage>) -> usize {
        packages.map(|p| p.package.len()).max().unwrap_or(0)
    }

    fn format_resolved_line(
        &self,
        package: &ResolvedPackage,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let Resolution::Resolved(version) = &package.resolution else {
            return Ok(());
        };

        if self.color {
            let name_display = format!("{:width$}", package.package, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {}",
                name_display,
                version.declared().green().bold(),
                format!("[{}]", package.ecosystem.id()).dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} [{}]",
                package.package,
                version.declared(),
                package.ecosystem.id(),
                width = max_name_len
            )
        }
    }

    /// One declaration, with its manifest shown relative to the project
    fn format_source_line(
        &self,
        record: &DependencyRecord,
        project_root: &Path,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let manifest = record
            .source_manifest
            .strip_prefix(project_root)
            .unwrap_or(&record.source_manifest)
            .display()
            .to_string();

        if self.color {
            writeln!(
                writer,
                "      {} {}",
                format!("{:16}", record.constraint.raw).yellow(),
                manifest.dimmed()
            )
        } else {
            writeln!(writer, "      {:16} {}", record.constraint.raw, manifest)
        }
    }

    fn format_unresolved(
        &self,
        package: &ResolvedPackage,
        project_root: &Path,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let Resolution::Unresolved(conflict) = &package.resolution else {
            return Ok(());
        };

        if self.color {
            writeln!(
                writer,
                "  {} {}: {}",
                package.package.red().bold(),
                format!("[{}]", package.ecosystem.id()).dimmed(),
                conflict.reason
            )?;
        } else {
            writeln!(
                writer,
                "  {} [{}]: {}",
                package.package,
                package.ecosystem.id(),
                conflict.reason
            )?;
        }

        for record in &conflict.records {
            self.format_source_line(record, project_root, writer)?;
        }
        Ok(())
    }

    fn format_ambiguity(&self, conflict: &Conflict, writer: &mut dyn Write) -> std::io::Result<()> {
        let mut ecosystems: Vec<String> = Vec::new();
        for record in &conflict.records {
            let label = format!("{} ({})", record.ecosystem.id(), record.name);
            if !ecosystems.contains(&label) {
                ecosystems.push(label);
            }
        }
        let declared = ecosystems.join(", ");

        if self.color {
            writeln!(
                writer,
                "  {} {} {}",
                conflict.package.cyan(),
                "declared in".dimmed(),
                declared
            )
        } else {
            writeln!(writer, "  {} declared in {}", conflict.package, declared)
        }
    }

    fn write_summary_line(
        &self,
        summary: &ReportSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let blocking = summary.conflicts.incompatible_range + summary.conflicts.unparsable_version;

        if self.color {
            let unresolved = if summary.unresolved > 0 {
                summary.unresolved.to_string().red().bold().to_string()
            } else {
                summary.unresolved.to_string().green().to_string()
            };
            writeln!(
                writer,
                "{} {} packages, {} resolved, {} unresolved, {} conflicts, {} ambiguous",
                "Summary:".bold(),
                summary.packages,
                summary.resolved.to_string().green(),
                unresolved,
                blocking,
                summary.conflicts.cross_ecosystem_ambiguous
            )?;
        } else {
            writeln!(
                writer,
                "Summary: {} packages, {} resolved, {} unresolved, {} conflicts, {} ambiguous",
                summary.packages,
                summary.resolved,
                summary.unresolved,
                blocking,
                summary.conflicts.cross_ecosystem_ambiguous
            )?;
        }

        if summary.failed_ecosystems > 0 {
            let line = format!("{} ecosystem(s) failed to analyze", summary.failed_ecosystems);
            if self.color {
                writeln!(writer, "{}", line.red())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &AnalysisReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let resolution = &report.resolution;

        if report.graph.is_empty() && !report.has_errors() {
            writeln!(writer, "No dependencies found.")?;
            return Ok(());
        }

        // Resolved packages
        if self.verbosity != Verbosity::Quiet && resolution.resolved_count() > 0 {
            self.heading("Resolved", resolution.resolved_count(), writer)?;
            let max_name_len = self.max_name_length(resolution.resolved()).max(20);
            for package in resolution.resolved() {
                self.format_resolved_line(package, max_name_len, writer)?;
                if self.verbosity == Verbosity::Verbose {
                    for record in &package.records {
                        self.format_source_line(record, &report.project_root, writer)?;
                    }
                }
            }
            writeln!(writer)?;
        }

        // Unresolved packages, never with a suggested version
        if resolution.unresolved_count() > 0 {
            self.heading("Unresolved", resolution.unresolved_count(), writer)?;
            for package in resolution.unresolved() {
                self.format_unresolved(package, &report.project_root, writer)?;
            }
            writeln!(writer)?;
        }

        // Ambiguity notices
        let ambiguous: Vec<&Conflict> = report
            .conflicts_with(ConflictReason::CrossEcosystemAmbiguous)
            .collect();
        if self.verbosity != Verbosity::Quiet && !ambiguous.is_empty() {
            self.heading("Declared in several ecosystems", ambiguous.len(), writer)?;
            for conflict in ambiguous {
                self.format_ambiguity(conflict, writer)?;
            }
            writeln!(writer)?;
        }

        // Errors
        if report.has_errors() {
            self.heading("Errors", report.errors.len(), writer)?;
            for error in &report.errors {
                if self.color {
                    writeln!(
                        writer,
                        "  {} {}",
                        format!("{}:", error.ecosystem.id()).red().bold(),
                        error.error
                    )?;
                } else {
                    writeln!(writer, "  {}: {}", error.ecosystem.id(), error.error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&report.summary(), writer)
    }

    fn format_summary(
        &self,
        summary: &ReportSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_summary_line(summary, writer)?;

        if self.verbosity == Verbosity::Verbose {
            for (ecosystem, count) in &summary.records_by_ecosystem {
                writeln!(
                    writer,
                    "  {}: {} {}",
                    ecosystem.display_name(),
                    count,
                    if *count == 1 { "record" } else { "records" }
                )?;
            }
        }
        Ok(())
    }
}
