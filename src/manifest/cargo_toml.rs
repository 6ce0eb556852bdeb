//! Cargo.toml parser for Rust projects
//!
//! Handles:
//! - dependencies
//! - dev-dependencies
//! - build-dependencies
//! - target-specific tables: `[target.'cfg(..)'.dependencies]`
//! - Inline table format: `{ version = "1.0" }`
//! - Renamed dependencies: `{ package = "real-name", version = "1.0" }`
//!
//! Workspace-inherited (`workspace = true`), path and git dependencies
//! without a version requirement carry no constraint and are skipped.

use crate::domain::{push_merged, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{ManifestFile, ManifestParser};
use crate::parser::{ConstraintParser, RustConstraintParser};
use std::path::Path;
use toml::Value;

/// Parser for Cargo.toml files
pub struct CargoTomlParser;

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

impl ManifestParser for CargoTomlParser {
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
        let toml: toml::Table = manifest
            .content
            .parse()
            .map_err(|e: toml::de::Error| {
                ManifestError::toml_parse_error(&manifest.path, e.to_string())
            })?;

        let mut records = Vec::new();

        for section in DEPENDENCY_SECTIONS {
            if let Some(deps) = toml.get(section).and_then(|d| d.as_table()) {
                parse_cargo_dependencies(deps, &manifest.path, &mut records);
            }
        }

        // Parse target-specific dependencies
        if let Some(target) = toml.get("target").and_then(|t| t.as_table()) {
            for target_config in target.values() {
                for section in DEPENDENCY_SECTIONS {
                    if let Some(deps) = target_config.get(section).and_then(|d| d.as_table()) {
                        parse_cargo_dependencies(deps, &manifest.path, &mut records);
                    }
                }
            }
        }

        // Workspace root: [workspace.dependencies]
        if let Some(deps) = toml
            .get("workspace")
            .and_then(|w| w.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            parse_cargo_dependencies(deps, &manifest.path, &mut records);
        }

        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rust
    }
}

fn parse_cargo_dependencies(
    deps: &toml::map::Map<String, Value>,
    source: &Path,
    output: &mut Vec<DependencyRecord>,
) {
    let parser = RustConstraintParser;
    for (name, value) in deps {
        let (package, version_str) = match value {
            // Simple string: package = "1.0.0"
            Value::String(s) => (name.as_str(), Some(s.as_str())),
            // Inline table: package = { version = "1.0.0", features = [...] }
            Value::Table(t) => (
                t.get("package").and_then(Value::as_str).unwrap_or(name),
                t.get("version").and_then(Value::as_str),
            ),
            _ => (name.as_str(), None),
        };

        let Some(version_str) = version_str else {
            tracing::debug!(package = %name, "skipping dependency without a version requirement");
            continue;
        };

        push_merged(
            output,
            DependencyRecord::new(package, Ecosystem::Rust, parser.parse(version_str), source),
        );
    }
}
