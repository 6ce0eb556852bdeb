//! Lockfile readers that seed the [`VersionCatalog`]
//!
//! Handles:
//! - Cargo.lock: every `[[package]]` entry
//! - package-lock.json v2/v3: the `packages` map (`node_modules/<name>`)
//! - package-lock.json v1: the nested `dependencies` map
//!
//! Lockfiles are optional input. A missing file contributes nothing and a
//! corrupt one is logged and skipped.

use super::detector::detect_lockfiles;
use super::reader::read_manifest_blocking;
use super::ManifestFile;
use crate::domain::{Ecosystem, Version, VersionCatalog};
use crate::error::ManifestError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Size cap for lockfiles, which routinely dwarf the manifests
pub const MAX_LOCKFILE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<CargoLockPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoLockPackage {
    name: String,
    version: String,
}

/// `(name, version)` pairs listed in a Cargo.lock
pub fn parse_cargo_lock(lock: &ManifestFile) -> Result<Vec<(String, String)>, ManifestError> {
    let parsed: CargoLock = toml::from_str(&lock.content)
        .map_err(|e| ManifestError::toml_parse_error(&lock.path, e.to_string()))?;

    Ok(parsed
        .package
        .into_iter()
        .map(|p| (p.name, p.version))
        .collect())
}

/// `(name, version)` pairs listed in a package-lock.json
pub fn parse_package_lock(lock: &ManifestFile) -> Result<Vec<(String, String)>, ManifestError> {
    let json: Value = serde_json::from_str(&lock.content)
        .map_err(|e| ManifestError::json_parse_error(&lock.path, e.to_string()))?;

    let mut entries = Vec::new();

    if let Some(packages) = json.get("packages").and_then(Value::as_object) {
        for (pkg_path, info) in packages {
            // The root project is keyed by the empty string
            if pkg_path.is_empty() {
                continue;
            }
            let Some(version) = info.get("version").and_then(Value::as_str) else {
                continue;
            };
            // "node_modules/a/node_modules/@scope/b" is "@scope/b"
            let name = pkg_path
                .rsplit_once("node_modules/")
                .map(|(_, name)| name)
                .unwrap_or(pkg_path);
            entries.push((name.to_string(), version.to_string()));
        }
    }

    if let Some(dependencies) = json.get("dependencies").and_then(Value::as_object) {
        collect_v1_dependencies(dependencies, &mut entries);
    }

    Ok(entries)
}

fn collect_v1_dependencies(dependencies: &Map<String, Value>, output: &mut Vec<(String, String)>) {
    for (name, info) in dependencies {
        if let Some(version) = info.get("version").and_then(Value::as_str) {
            output.push((name.clone(), version.to_string()));
        }
        if let Some(nested) = info.get("dependencies").and_then(Value::as_object) {
            collect_v1_dependencies(nested, output);
        }
    }
}

/// Parse one lockfile into `catalog`
pub fn load_lockfile(
    lock: &ManifestFile,
    ecosystem: Ecosystem,
    catalog: &mut VersionCatalog,
) -> Result<usize, ManifestError> {
    let entries = match lock.file_name() {
        "Cargo.lock" => parse_cargo_lock(lock)?,
        "package-lock.json" => parse_package_lock(lock)?,
        _ => {
            return Err(ManifestError::UnsupportedFormat {
                path: lock.path.clone(),
            })
        }
    };

    let count = entries.len();
    for (name, version) in entries {
        catalog.insert(ecosystem, name, Version::parse(&version));
    }
    Ok(count)
}

/// Build a catalog from every lockfile present in `dir`
pub fn load_lockfiles(dir: &Path) -> VersionCatalog {
    let mut catalog = VersionCatalog::new();

    for info in detect_lockfiles(dir) {
        let loaded = read_manifest_blocking(&info.path, MAX_LOCKFILE_BYTES)
            .and_then(|lock| load_lockfile(&lock, info.ecosystem, &mut catalog));

        match loaded {
            Ok(count) => {
                tracing::debug!(path = %info.path.display(), versions = count, "loaded lockfile");
            }
            Err(e) => {
                tracing::warn!(path = %info.path.display(), error = %e, "skipping lockfile");
            }
        }
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "my-app"
version = "0.1.0"

[[package]]
name = "serde"
version = "1.0.196"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "abc123"
"#;

    #[test]
    fn test_parse_cargo_lock() {
        let entries = parse_cargo_lock(&ManifestFile::new("Cargo.lock", CARGO_LOCK)).unwrap();
        assert_eq!(
            entries,
            vec![
                ("my-app".to_string(), "0.1.0".to_string()),
                ("serde".to_string(), "1.0.196".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_package_lock_v3() {
        let content = r#"{
            "lockfileVersion": 3,
            "packages": {
                "": { "name": "web", "version": "1.0.0" },
                "node_modules/lodash": { "version": "4.17.21" },
                "node_modules/@types/node": { "version": "20.10.0" },
                "node_modules/a/node_modules/lodash": { "version": "3.10.1" }
            }
        }"#;

        let entries = parse_package_lock(&ManifestFile::new("package-lock.json", content)).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&("@types/node".to_string(), "20.10.0".to_string())));
        assert!(entries.contains(&("lodash".to_string(), "3.10.1".to_string())));
    }

    #[test]
    fn test_parse_package_lock_v1() {
        let content = r#"{
            "lockfileVersion": 1,
            "dependencies": {
                "express": {
                    "version": "4.18.2",
                    "dependencies": { "debug": { "version": "2.6.9" } }
                }
            }
        }"#;

        let entries = parse_package_lock(&ManifestFile::new("package-lock.json", content)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], ("debug".to_string(), "2.6.9".to_string()));
    }

    #[test]
    fn test_load_lockfile_rejects_unknown_format() {
        let mut catalog = VersionCatalog::new();
        let err = load_lockfile(
            &ManifestFile::new("yarn.lock", ""),
            Ecosystem::JavaScript,
            &mut catalog,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_lockfiles() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Cargo.lock"), CARGO_LOCK).unwrap();
        fs::write(
            temp_dir.path().join("package-lock.json"),
            r#"{ "packages": { "node_modules/lodash": { "version": "4.17.21" } } }"#,
        )
        .unwrap();

        let catalog = load_lockfiles(temp_dir.path());
        assert_eq!(catalog.versions(Ecosystem::Rust, "serde")[0].raw(), "1.0.196");
        assert_eq!(
            catalog.versions(Ecosystem::JavaScript, "lodash")[0].raw(),
            "4.17.21"
        );
    }

    #[test]
    fn test_load_lockfiles_skips_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Cargo.lock"), "[[package]\nname = ").unwrap();
        fs::write(
            temp_dir.path().join("package-lock.json"),
            r#"{ "packages": { "node_modules/lodash": { "version": "4.17.21" } } }"#,
        )
        .unwrap();

        let catalog = load_lockfiles(temp_dir.path());
        assert!(catalog.versions(Ecosystem::Rust, "serde").is_empty());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_lockfiles_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_lockfiles(temp_dir.path()).is_empty());
    }
}
