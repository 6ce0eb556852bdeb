//! Dependency records produced by the analyzers

use super::{Constraint, Ecosystem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One dependency declaration, as read from one manifest entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Package name (normalized per ecosystem)
    pub name: String,
    /// Ecosystem the declaration belongs to
    pub ecosystem: Ecosystem,
    /// Version constraint
    pub constraint: Constraint,
    /// Manifest that declared the dependency
    pub source_manifest: PathBuf,
}

impl DependencyRecord {
    /// Creates a new record
    pub fn new(
        name: impl Into<String>,
        ecosystem: Ecosystem,
        constraint: Constraint,
        source_manifest: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            ecosystem,
            constraint,
            source_manifest: source_manifest.into(),
        }
    }

    /// Path of the declaring manifest
    pub fn source(&self) -> &Path {
        &self.source_manifest
    }

    /// Returns true if the constraint declares an exact pin
    pub fn is_pinned(&self) -> bool {
        self.constraint.is_pinned()
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] ({})",
            self.name,
            self.constraint,
            self.ecosystem,
            self.source_manifest.display()
        )
    }
}

/// Append `record`, merging it into an existing record for the same
/// package from the same manifest so each (package, ecosystem, manifest)
/// triple carries exactly one constraint.
pub fn push_merged(records: &mut Vec<DependencyRecord>, record: DependencyRecord) {
    if let Some(existing) = records.iter_mut().find(|r| {
        r.name == record.name
            && r.ecosystem == record.ecosystem
            && r.source_manifest == record.source_manifest
    }) {
        existing.constraint = existing.constraint.intersect(&record.constraint);
        return;
    }
    records.push(record);
}
