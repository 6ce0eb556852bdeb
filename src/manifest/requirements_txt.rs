//! requirements.txt parser for Python projects
//!
//! Handles:
//! - PEP 508 requirement lines: `name[extras] specifier ; marker`
//! - Comments and trailing comments
//! - Line continuations (`\`)
//!
//! Option lines (`-r`, `-e`, `--index-url`, ...) and bare URLs or paths
//! carry no package name and are skipped.

use crate::domain::{push_merged, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{ManifestFile, ManifestParser};
use crate::parser::{normalize_python_name, ConstraintParser, PythonConstraintParser};
use regex::Regex;
use std::sync::LazyLock;

/// Parser for requirements.txt files
pub struct RequirementsTxtParser;

// name, optional [extras], then whatever specifier follows
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*(.*)$").unwrap()
});
static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#.*$").unwrap());

/// Split a PEP 508 requirement into its normalized name and specifier text
///
/// Environment markers are dropped; a parenthesized specifier is unwrapped.
pub(crate) fn parse_requirement(requirement: &str) -> Option<(String, String)> {
    let without_marker = requirement.split(';').next().unwrap_or("").trim();
    let caps = REQUIREMENT_RE.captures(without_marker)?;
    let name = normalize_python_name(&caps[1]);
    let specifier = caps[2].trim();
    let specifier = specifier
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(specifier)
        .trim();
    Some((name, specifier.to_string()))
}

/// Join continuation lines and strip comments
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();

    for line in content.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let line = INLINE_COMMENT_RE.replace(line, "");
        match line.strip_suffix('\\') {
            Some(head) => {
                pending.push_str(head);
                pending.push(' ');
            }
            None => {
                pending.push_str(&line);
                lines.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.trim().is_empty() {
        lines.push(pending);
    }

    lines
}

impl ManifestParser for RequirementsTxtParser {
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
        let parser = PythonConstraintParser;
        let mut records = Vec::new();

        for line in logical_lines(&manifest.content) {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('-') {
                continue;
            }
            if trimmed.contains("://") && !trimmed.contains('@') {
                tracing::debug!(line = trimmed, "skipping requirement without a package name");
                continue;
            }

            let Some((name, specifier)) = parse_requirement(trimmed) else {
                tracing::debug!(line = trimmed, "skipping unrecognized requirement line");
                continue;
            };

            push_merged(
                &mut records,
                DependencyRecord::new(name, Ecosystem::Python, parser.parse(&specifier), &manifest.path),
            );
        }

        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }
}
