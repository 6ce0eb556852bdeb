//! package.json parser for JavaScript projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies
//!
//! A package listed in several sections becomes one record whose
//! constraint is the conjunction of every listing.

use crate::domain::{push_merged, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{ManifestFile, ManifestParser};
use crate::parser::{ConstraintParser, JavaScriptConstraintParser};
use serde_json::{Map, Value};
use std::path::Path;

/// Parser for package.json files
pub struct PackageJsonParser;

const DEPENDENCY_SECTIONS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

impl ManifestParser for PackageJsonParser {
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
        let json: Value = serde_json::from_str(&manifest.content)
            .map_err(|e| ManifestError::json_parse_error(&manifest.path, e.to_string()))?;

        let mut records = Vec::new();

        for section in DEPENDENCY_SECTIONS {
            if let Some(deps) = json.get(section).and_then(|v| v.as_object()) {
                parse_dependency_object(deps, &manifest.path, &mut records);
            }
        }

        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::JavaScript
    }
}

fn parse_dependency_object(
    deps: &Map<String, Value>,
    source: &Path,
    output: &mut Vec<DependencyRecord>,
) {
    let parser = JavaScriptConstraintParser;
    for (name, version_value) in deps {
        let Some(version_str) = version_value.as_str() else {
            tracing::debug!(package = %name, "skipping non-string version in package.json");
            continue;
        };
        push_merged(
            output,
            DependencyRecord::new(
                name.clone(),
                Ecosystem::JavaScript,
                parser.parse(version_str),
                source,
            ),
        );
    }
}
