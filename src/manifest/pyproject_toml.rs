//! pyproject.toml parser for Python projects
//!
//! Handles:
//! - project.dependencies (PEP 621)
//! - project.optional-dependencies (PEP 621)
//! - tool.poetry.dependencies (Poetry)
//! - tool.poetry.dev-dependencies (Poetry)
//! - tool.poetry.group.<name>.dependencies (Poetry 1.2+)

use super::requirements_txt::parse_requirement;
use crate::domain::{push_merged, Constraint, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{ManifestFile, ManifestParser};
use crate::parser::{normalize_python_name, ConstraintParser, PythonConstraintParser};
use toml::Value;

/// Parser for pyproject.toml files
pub struct PyprojectTomlParser;

impl ManifestParser for PyprojectTomlParser {
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
        let toml: toml::Table = manifest
            .content
            .parse()
            .map_err(|e: toml::de::Error| {
                ManifestError::toml_parse_error(&manifest.path, e.to_string())
            })?;

        let mut records = Vec::new();
        let parser = PythonConstraintParser;
        let mut push = |name: String, constraint: Constraint| {
            push_merged(
                &mut records,
                DependencyRecord::new(name, Ecosystem::Python, constraint, &manifest.path),
            );
        };

        let project = toml.get("project");

        // PEP 621 project.dependencies
        if let Some(deps) = project
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
        {
            for requirement in deps.iter().filter_map(Value::as_str) {
                if let Some((name, specifier)) = parse_requirement(requirement) {
                    push(name, parser.parse(&specifier));
                }
            }
        }

        // PEP 621 project.optional-dependencies
        if let Some(optional) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(|d| d.as_table())
        {
            for deps in optional.values().filter_map(Value::as_array) {
                for requirement in deps.iter().filter_map(Value::as_str) {
                    if let Some((name, specifier)) = parse_requirement(requirement) {
                        push(name, parser.parse(&specifier));
                    }
                }
            }
        }

        let poetry = toml.get("tool").and_then(|t| t.get("poetry"));
        let mut poetry_tables = Vec::new();
        if let Some(poetry) = poetry {
            poetry_tables.extend(poetry.get("dependencies").and_then(Value::as_table));
            poetry_tables.extend(poetry.get("dev-dependencies").and_then(Value::as_table));
            if let Some(groups) = poetry.get("group").and_then(Value::as_table) {
                for group in groups.values() {
                    poetry_tables.extend(group.get("dependencies").and_then(Value::as_table));
                }
            }
        }

        for table in poetry_tables {
            for (name, value) in table {
                // The interpreter requirement is not a package
                if name == "python" {
                    continue;
                }
                if let Some(constraint) = poetry_constraint(value, &parser) {
                    push(normalize_python_name(name), constraint);
                }
            }
        }

        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }
}

/// Constraint of a Poetry dependency value
///
/// Path, git and url dependencies without a version carry no constraint
/// and yield `None`. Multiple-constraint arrays are marker-selected
/// alternatives and are kept as an opaque union.
fn poetry_constraint(value: &Value, parser: &PythonConstraintParser) -> Option<Constraint> {
    match value {
        Value::String(s) => Some(parser.parse(s)),
        Value::Table(t) => t.get("version")?.as_str().map(|s| parser.parse(s)),
        Value::Array(alternatives) => {
            let versions: Vec<&str> = alternatives
                .iter()
                .filter_map(|alt| alt.get("version").and_then(Value::as_str))
                .collect();
            match versions.as_slice() {
                [] => None,
                [only] => Some(parser.parse(only)),
                _ => Some(parser.parse(&versions.join(" || "))),
            }
        }
        _ => None,
    }
}
