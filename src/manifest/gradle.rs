//! Gradle manifest parser for Java projects
//!
//! Handles:
//! - build.gradle (Groovy DSL)
//! - build.gradle.kts (Kotlin DSL)
//! - Variable definitions (def, val, ext block)
//! - Map notation dependencies: group: 'x', name: 'y', version: 'z'
//! - String notation dependencies: 'group:name:version'
//! - Variable references in versions
//!
//! Gradle has no structure a line scanner can reject, so this parser
//! never fails; lines it does not recognize are ignored.

use crate::domain::{push_merged, Constraint, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{ManifestFile, ManifestParser};
use crate::parser::{ConstraintParser, JavaConstraintParser};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Parser for build.gradle and build.gradle.kts files
pub struct GradleParser;

// Variable definition (Groovy): def jacksonVersion = '1.2.3' or "1.2.3"
static VAR_DEF_GROOVY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*def\s+(\w+)\s*=\s*['"]([^'"]+)['"]"#).unwrap());

// Variable definition (Kotlin): val jacksonVersion = "1.2.3"
static VAR_DEF_KOTLIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*val\s+(\w+)\s*=\s*"([^"]+)""#).unwrap());

// ext block variable: jacksonVersion = '1.2.3' or "1.2.3"
static EXT_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*(\w+)\s*=\s*['"]([^'"]+)['"]"#).unwrap());

static EXT_BLOCK_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*ext\s*\{").unwrap());

// Map notation dependency: implementation group: 'x', name: 'y', version: 'z'
// Also handles: implementation(group: 'x', name: 'y', version: 'z')
static DEP_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(\w+)\s*[\(\s]+group:\s*['"]([^'"]+)['"]\s*,\s*name:\s*['"]([^'"]+)['"]\s*(?:,\s*version:\s*['"]?([^'",\)\s]+)['"]?)?"#,
    )
    .unwrap()
});

// String notation dependency: implementation 'group:name:version'
static DEP_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(\w+)\s*[\(\s]*['"]([^:'"\s]+):([^:'"\s]+)(?::([^'"]+))?['"]"#).unwrap()
});

// Configurations that declare dependencies; anything else (plugins,
// repositories, `id 'java'`) is ignored
const CONFIGURATIONS: [&str; 14] = [
    "implementation",
    "api",
    "compileOnly",
    "runtimeOnly",
    "annotationProcessor",
    "compile",
    "runtime",
    "testImplementation",
    "testCompileOnly",
    "testRuntimeOnly",
    "testApi",
    "androidTestImplementation",
    "debugImplementation",
    "kapt",
];

impl GradleParser {
    /// Extract variable definitions from content
    fn extract_variables(&self, content: &str) -> HashMap<String, String> {
        let mut variables = HashMap::new();
        let mut in_ext_block = false;
        let mut brace_depth = 0usize;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            if EXT_BLOCK_START.is_match(trimmed) {
                in_ext_block = !trimmed.contains('}');
                brace_depth = usize::from(in_ext_block);
                continue;
            }

            if in_ext_block {
                brace_depth += trimmed.matches('{').count();
                brace_depth = brace_depth.saturating_sub(trimmed.matches('}').count());
                if brace_depth == 0 {
                    in_ext_block = false;
                }
            }

            let caps = VAR_DEF_GROOVY
                .captures(line)
                .or_else(|| VAR_DEF_KOTLIN.captures(line))
                .or_else(|| {
                    if in_ext_block {
                        EXT_VAR.captures(line)
                    } else {
                        None
                    }
                });

            if let Some(caps) = caps {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                if !name.is_empty() && !value.is_empty() {
                    variables.insert(name.to_string(), value.to_string());
                }
            }
        }

        variables
    }

    /// Resolve a version value, handling `$name`, `${name}` and bare
    /// identifier references
    fn resolve_version(&self, version_raw: &str, variables: &HashMap<String, String>) -> String {
        let trimmed = version_raw.trim();

        let var_name = if let Some(inner) =
            trimmed.strip_prefix("${").and_then(|s| s.strip_suffix('}'))
        {
            Some(inner)
        } else if let Some(stripped) = trimmed.strip_prefix('$') {
            Some(stripped)
        } else if !trimmed.starts_with(|c: char| c.is_ascii_digit() || c == '[' || c == '(') {
            Some(trimmed)
        } else {
            None
        };

        if let Some(value) = var_name.and_then(|name| variables.get(name)) {
            return value.clone();
        }

        trimmed
            .trim_start_matches(['\'', '"'])
            .trim_end_matches(['\'', '"'])
            .to_string()
    }

    /// Coordinates and raw version of one dependency line
    fn parse_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str, Option<&'a str>)> {
        let caps = DEP_MAP.captures(line).or_else(|| DEP_STRING.captures(line))?;

        let config = caps.get(1)?.as_str();
        if !CONFIGURATIONS.contains(&config) {
            return None;
        }
        let group = caps.get(2)?.as_str();
        let artifact = caps.get(3)?.as_str();
        Some((group, artifact, caps.get(4).map(|m| m.as_str())))
    }
}

impl ManifestParser for GradleParser {
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
        let parser = JavaConstraintParser;
        let variables = self.extract_variables(&manifest.content);
        let mut records = Vec::new();

        for line in manifest.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            let Some((group, artifact, version_raw)) = self.parse_line(line) else {
                continue;
            };

            let constraint = match version_raw.map(|v| self.resolve_version(v, &variables)) {
                Some(version) if !version.is_empty() => parser.parse(&version),
                _ => Constraint::any(),
            };

            push_merged(
                &mut records,
                DependencyRecord::new(
                    format!("{}:{}", group, artifact),
                    Ecosystem::Java,
                    constraint,
                    &manifest.path,
                ),
            );
        }

        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Java
    }
}
