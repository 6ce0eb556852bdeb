//! Resolution results handed to the fetch step

use super::{Conflict, ConflictReason, DependencyRecord, Ecosystem, Version};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Outcome for one package
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A single version satisfies every declaration
    Resolved(Version),
    /// No version could be chosen; carries the originating conflict
    Unresolved(Conflict),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn version(&self) -> Option<&Version> {
        match self {
            Resolution::Resolved(version) => Some(version),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            Resolution::Resolved(_) => None,
            Resolution::Unresolved(conflict) => Some(conflict),
        }
    }
}

/// Resolution of one package within one ecosystem
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPackage {
    pub package: String,
    pub ecosystem: Ecosystem,
    pub resolution: Resolution,
    /// Records that declared this package in this ecosystem
    pub records: Vec<DependencyRecord>,
}

impl ResolvedPackage {
    /// Flatten into the serialized report shape
    pub fn to_record(&self) -> ResolutionRecord {
        let (reason, contributors) = match &self.resolution {
            Resolution::Resolved(_) => (None, Vec::new()),
            Resolution::Unresolved(conflict) => (
                Some(conflict.reason),
                conflict.records.iter().map(SourceRecord::from).collect(),
            ),
        };
        ResolutionRecord {
            package: self.package.clone(),
            ecosystem: self.ecosystem,
            // Declared text, not the padded semver: Maven `31.1` stays `31.1`
            version: self.resolution.version().map(|v| v.declared().to_string()),
            reason,
            sources: contributors,
        }
    }
}

impl fmt::Display for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolution {
            Resolution::Resolved(version) => {
                write!(f, "{} {} [{}]", self.package, version, self.ecosystem)
            }
            Resolution::Unresolved(conflict) => write!(
                f,
                "{} unresolved [{}]: {}",
                self.package, self.ecosystem, conflict.reason
            ),
        }
    }
}

/// A contributing declaration in a serialized report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub manifest: String,
    pub constraint: String,
}

impl From<&DependencyRecord> for SourceRecord {
    fn from(record: &DependencyRecord) -> Self {
        Self {
            manifest: record.source_manifest.display().to_string(),
            constraint: record.constraint.raw.clone(),
        }
    }
}

/// Serialized form of one resolution entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub package: String,
    pub ecosystem: Ecosystem,
    /// Resolved version, `null` when unresolved
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ConflictReason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRecord>,
}

/// Resolved versions for every (package, ecosystem) in the graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionResult {
    entries: Vec<ResolvedPackage>,
}

impl ResolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ResolvedPackage) {
        self.entries.push(entry);
    }

    /// Entries in graph order
    pub fn entries(&self) -> &[ResolvedPackage] {
        &self.entries
    }

    /// Lookup by package key and ecosystem
    pub fn get(&self, package: &str, ecosystem: Ecosystem) -> Option<&ResolvedPackage> {
        self.entries
            .iter()
            .find(|e| e.package == package && e.ecosystem == ecosystem)
    }

    /// Resolved version of a package, if any
    pub fn version_of(&self, package: &str, ecosystem: Ecosystem) -> Option<&Version> {
        self.get(package, ecosystem)
            .and_then(|e| e.resolution.version())
    }

    pub fn resolved(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.entries.iter().filter(|e| e.resolution.is_resolved())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.entries.iter().filter(|e| !e.resolution.is_resolved())
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved().count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    /// Returns true if every package resolved
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved_count() == 0
    }

    /// Entries the fetch step may install: only resolved ones
    pub fn installable(&self) -> impl Iterator<Item = (&str, Ecosystem, &Version)> {
        self.entries.iter().filter_map(|e| {
            e.resolution
                .version()
                .map(|v| (e.package.as_str(), e.ecosystem, v))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialized report records
    pub fn to_records(&self) -> Vec<ResolutionRecord> {
        self.entries.iter().map(ResolvedPackage::to_record).collect()
    }
}

impl Serialize for ResolutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_records())
    }
}
