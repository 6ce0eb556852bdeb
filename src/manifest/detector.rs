//! Manifest file detection
//!
//! Looks for every manifest and lock file the supported ecosystems read,
//! directly under the project root, in a fixed ecosystem order.

use crate::domain::Ecosystem;
use std::path::{Path, PathBuf};

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Ecosystem of the manifest
    pub ecosystem: Ecosystem,
}

impl ManifestInfo {
    /// Create a new ManifestInfo
    pub fn new(path: impl Into<PathBuf>, ecosystem: Ecosystem) -> Self {
        Self {
            path: path.into(),
            ecosystem,
        }
    }
}

/// The contents of one manifest file, already read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Path to the manifest file, used for attribution
    pub path: PathBuf,
    /// Content of the manifest file
    pub content: String,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// File name component of the path, empty if there is none
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }
}

/// Detect all manifest files in the given directory
///
/// Results are ordered by ecosystem, then by each ecosystem's manifest
/// priority. Missing files are simply absent from the result.
pub fn detect_manifests(dir: &Path) -> Vec<ManifestInfo> {
    detect(dir, Ecosystem::manifest_filenames)
}

/// Detect lock files that can seed the version catalog
pub fn detect_lockfiles(dir: &Path) -> Vec<ManifestInfo> {
    detect(dir, Ecosystem::lock_filenames)
}

fn detect(dir: &Path, names: fn(&Ecosystem) -> &'static [&'static str]) -> Vec<ManifestInfo> {
    let mut found = Vec::new();
    for ecosystem in Ecosystem::all() {
        for name in names(ecosystem) {
            let path = dir.join(name);
            if path.is_file() {
                found.push(ManifestInfo::new(path, *ecosystem));
            }
        }
    }
    found
}
