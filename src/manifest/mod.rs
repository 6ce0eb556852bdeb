//! Manifest file detection, reading and parsing
//!
//! This module provides functionality to:
//! - Detect manifest and lock files in a directory
//! - Read them under a size and time bound
//! - Parse dependency records from every supported manifest format
//! - Seed a version catalog from lockfiles

mod cargo_toml;
mod detector;
mod gradle;
mod lockfile;
mod package_json;
mod pom_xml;
mod pyproject_toml;
mod reader;
mod requirements_txt;

pub use cargo_toml::CargoTomlParser;
pub use detector::{detect_lockfiles, detect_manifests, ManifestFile, ManifestInfo};
pub use gradle::GradleParser;
pub use lockfile::{
    load_lockfile, load_lockfiles, parse_cargo_lock, parse_package_lock, MAX_LOCKFILE_BYTES,
};
pub use package_json::PackageJsonParser;
pub use pom_xml::PomXmlParser;
pub use pyproject_toml::PyprojectTomlParser;
pub use reader::{
    read_manifest, read_manifest_blocking, read_manifests, ReadLimits,
    DEFAULT_MAX_MANIFEST_BYTES, DEFAULT_READ_TIMEOUT,
};
pub use requirements_txt::RequirementsTxtParser;

use crate::domain::{DependencyRecord, Ecosystem};
use crate::error::ManifestError;

/// Trait for parsing manifest files
pub trait ManifestParser: Send + Sync {
    /// Parse dependency records from a manifest already read into memory
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError>;

    /// Returns the ecosystem this parser handles
    fn ecosystem(&self) -> Ecosystem;
}

/// Get a manifest parser for a manifest file name
pub fn get_parser(file_name: &str) -> Option<Box<dyn ManifestParser>> {
    let parser: Box<dyn ManifestParser> = match file_name {
        "requirements.txt" => Box::new(RequirementsTxtParser),
        "pyproject.toml" => Box::new(PyprojectTomlParser),
        "package.json" => Box::new(PackageJsonParser),
        "pom.xml" => Box::new(PomXmlParser),
        "build.gradle" | "build.gradle.kts" => Box::new(GradleParser),
        "Cargo.toml" => Box::new(CargoTomlParser),
        _ => return None,
    };
    Some(parser)
}

/// Parse a manifest, choosing the parser from its file name
pub fn parse_manifest(manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
    let parser = get_parser(manifest.file_name()).ok_or_else(|| {
        ManifestError::UnsupportedFormat {
            path: manifest.path.clone(),
        }
    })?;
    parser.parse(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_parser_for_every_manifest_name() {
        for ecosystem in Ecosystem::all() {
            for name in ecosystem.manifest_filenames() {
                let parser = get_parser(name).unwrap();
                assert_eq!(parser.ecosystem(), *ecosystem, "{}", name);
            }
        }
    }

    #[test]
    fn test_get_parser_unknown() {
        assert!(get_parser("go.mod").is_none());
        assert!(get_parser("Gemfile").is_none());
    }

    #[test]
    fn test_parse_manifest_dispatch() {
        let records =
            parse_manifest(&ManifestFile::new("app/Cargo.toml", "[dependencies]\nserde = \"1\"\n"))
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ecosystem, Ecosystem::Rust);
        assert_eq!(records[0].source_manifest.to_str(), Some("app/Cargo.toml"));
    }

    #[test]
    fn test_parse_manifest_unsupported() {
        let err = parse_manifest(&ManifestFile::new("go.mod", "module x")).unwrap_err();
        assert!(matches!(err, ManifestError::UnsupportedFormat { .. }));
    }
}
