//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the resolution result, one entry per
//!   (package, ecosystem)
//! - Conflicts with their contributing declarations
//! - Per-ecosystem errors

use crate::domain::{ConflictReason, DependencyRecord, Ecosystem, ResolutionResult};
use crate::engine::{AnalysisReport, ReportSummary};
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// When the report was produced
    generated_at: DateTime<Utc>,
    /// Analyzed project directory
    project_root: String,
    /// Summary statistics
    summary: &'a ReportSummary,
    /// Per-package resolution
    resolution: &'a ResolutionResult,
    /// Detected conflicts, in detection order
    conflicts: Vec<JsonConflict>,
    /// Every declaration (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    records: Vec<JsonRecord>,
    /// Ecosystems that failed to analyze
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<JsonError>,
}

/// JSON representation of a conflict
#[derive(Serialize)]
struct JsonConflict {
    package: String,
    reason: ConflictReason,
    /// Set when every record belongs to one ecosystem
    #[serde(skip_serializing_if = "Option::is_none")]
    ecosystem: Option<Ecosystem>,
    blocking: bool,
    records: Vec<JsonRecord>,
}

/// JSON representation of one declaration
#[derive(Serialize)]
struct JsonRecord {
    name: String,
    ecosystem: Ecosystem,
    constraint: String,
    manifest: String,
}

impl From<&DependencyRecord> for JsonRecord {
    fn from(record: &DependencyRecord) -> Self {
        Self {
            name: record.name.clone(),
            ecosystem: record.ecosystem,
            constraint: record.constraint.raw.clone(),
            manifest: record.source_manifest.display().to_string(),
        }
    }
}

/// JSON representation of an ecosystem failure
#[derive(Serialize)]
struct JsonError {
    ecosystem: Ecosystem,
    path: String,
    message: String,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &AnalysisReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = report.summary();

        let records = if self.verbosity == Verbosity::Verbose {
            report.graph.records().map(JsonRecord::from).collect()
        } else {
            Vec::new()
        };

        let output = JsonOutput {
            generated_at: Utc::now(),
            project_root: report.project_root.display().to_string(),
            summary: &summary,
            resolution: &report.resolution,
            conflicts: report
                .conflicts
                .iter()
                .map(|c| JsonConflict {
                    package: c.package.clone(),
                    reason: c.reason,
                    ecosystem: c.ecosystem(),
                    blocking: c.is_blocking(),
                    records: c.records.iter().map(JsonRecord::from).collect(),
                })
                .collect(),
            records,
            errors: report
                .errors
                .iter()
                .map(|e| JsonError {
                    ecosystem: e.ecosystem,
                    path: e.error.path().display().to_string(),
                    message: e.error.to_string(),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &ReportSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzerRegistry;
    use crate::engine::{analyze, AnalysisRequest};
    use crate::manifest::ManifestFile;
    use serde_json::Value;

    fn render(report: &AnalysisReport, verbosity: Verbosity) -> Value {
        let mut buffer = Vec::new();
        JsonFormatter::new(verbosity)
            .format(report, &mut buffer)
            .unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    fn report() -> AnalysisReport {
        let request = AnalysisRequest::new("/project")
            .with_manifest(
                Ecosystem::Python,
                ManifestFile::new("/project/requirements.txt", "requests==2.28.0\nflask>=2.0\n"),
            )
            .with_manifest(
                Ecosystem::Python,
                ManifestFile::new(
                    "/project/pyproject.toml",
                    "[project]\ndependencies = [\"requests==2.31.0\"]\n",
                ),
            )
            .with_manifest(
                Ecosystem::Rust,
                ManifestFile::new("/project/Cargo.toml", "[dependencies"),
            );
        analyze(request, &AnalyzerRegistry::default())
    }

    #[test]
    fn test_resolution_schema() {
        let json = render(&report(), Verbosity::Normal);

        let resolution = json["resolution"].as_array().unwrap();
        assert_eq!(resolution.len(), 2);

        let requests = &resolution[0];
        assert_eq!(requests["package"], "requests");
        assert_eq!(requests["ecosystem"], "python");
        assert!(requests["version"].is_null());
        assert_eq!(requests["reason"], "incompatible_range");
        let sources = requests["sources"].as_array().unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0]["manifest"], "/project/requirements.txt");
        assert_eq!(sources[0]["constraint"], "==2.28.0");

        let flask = &resolution[1];
        assert_eq!(flask["version"], "2.0");
        assert!(flask.get("reason").is_none());
        assert!(flask.get("sources").is_none());
    }

    #[test]
    fn test_conflicts_and_errors() {
        let json = render(&report(), Verbosity::Normal);

        let conflicts = json["conflicts"].as_array().unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0]["reason"], "incompatible_range");
        assert_eq!(conflicts[0]["ecosystem"], "python");
        assert_eq!(conflicts[0]["blocking"], true);

        let errors = json["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["ecosystem"], "rust");
        assert_eq!(errors[0]["path"], "/project/Cargo.toml");
    }

    #[test]
    fn test_summary_and_metadata() {
        let json = render(&report(), Verbosity::Normal);

        assert_eq!(json["project_root"], "/project");
        assert!(json["generated_at"].as_str().is_some());
        assert_eq!(json["summary"]["packages"], 2);
        assert_eq!(json["summary"]["unresolved"], 1);
        assert_eq!(json["summary"]["records_by_ecosystem"]["python"], 3);
        assert_eq!(json["summary"]["conflicts"]["incompatible_range"], 1);
        assert_eq!(json["summary"]["failed_ecosystems"], 1);
        assert!(json.get("records").is_none());
    }

    #[test]
    fn test_verbose_includes_records() {
        let json = render(&report(), Verbosity::Verbose);
        assert_eq!(json["records"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_format_summary() {
        let mut buffer = Vec::new();
        JsonFormatter::new(Verbosity::Normal)
            .format_summary(&report().summary(), &mut buffer)
            .unwrap();
        let json: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["resolved"], 1);
    }
}
