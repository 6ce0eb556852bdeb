//! Known concrete versions, used as extra resolution candidates

use super::{Ecosystem, Version};
use std::collections::HashMap;

/// Concrete versions known per `(ecosystem, package)`, typically read from
/// lockfiles
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    entries: HashMap<(Ecosystem, String), Vec<Version>>,
}

impl VersionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a version; a duplicate raw value is ignored
    pub fn insert(&mut self, ecosystem: Ecosystem, package: impl Into<String>, version: Version) {
        let versions = self.entries.entry((ecosystem, package.into())).or_default();
        if !versions.iter().any(|v| v.raw() == version.raw()) {
            versions.push(version);
        }
    }

    /// Builder form of [`VersionCatalog::insert`]
    pub fn with(mut self, ecosystem: Ecosystem, package: impl Into<String>, version: &str) -> Self {
        self.insert(ecosystem, package, Version::parse(version));
        self
    }

    /// Versions known for a package, in insertion order
    pub fn versions(&self, ecosystem: Ecosystem, package: &str) -> &[Version] {
        self.entries
            .get(&(ecosystem, package.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fold another catalog into this one
    pub fn extend(&mut self, other: VersionCatalog) {
        for ((ecosystem, package), versions) in other.entries {
            for version in versions {
                self.insert(ecosystem, package.clone(), version);
            }
        }
    }

    /// Number of packages with at least one known version
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
