//! Conflict types produced by the detector

use super::{DependencyRecord, Ecosystem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a set of records could not be reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Constraints within one ecosystem admit no common version
    IncompatibleRange,
    /// A declared version could not be parsed as a semantic version
    UnparsableVersion,
    /// The same name is declared in more than one ecosystem
    CrossEcosystemAmbiguous,
}

impl ConflictReason {
    /// Returns true if this reason prevents resolution
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ConflictReason::CrossEcosystemAmbiguous)
    }

    /// Identifier used in reports
    pub fn label(&self) -> &'static str {
        match self {
            ConflictReason::IncompatibleRange => "incompatible_range",
            ConflictReason::UnparsableVersion => "unparsable_version",
            ConflictReason::CrossEcosystemAmbiguous => "cross_ecosystem_ambiguous",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::IncompatibleRange => write!(f, "incompatible version ranges"),
            ConflictReason::UnparsableVersion => write!(f, "unparsable version"),
            ConflictReason::CrossEcosystemAmbiguous => {
                write!(f, "declared in multiple ecosystems")
            }
        }
    }
}

/// A detected conflict for one package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Graph key of the package
    pub package: String,
    /// Records involved in the conflict
    pub records: Vec<DependencyRecord>,
    /// Conflict classification
    pub reason: ConflictReason,
}

impl Conflict {
    pub fn new(
        package: impl Into<String>,
        records: Vec<DependencyRecord>,
        reason: ConflictReason,
    ) -> Self {
        Self {
            package: package.into(),
            records,
            reason,
        }
    }

    /// The ecosystem of the records, when they all share one
    pub fn ecosystem(&self) -> Option<Ecosystem> {
        let first = self.records.first()?.ecosystem;
        self.records
            .iter()
            .all(|r| r.ecosystem == first)
            .then_some(first)
    }

    /// Returns true if this conflict prevents resolution
    pub fn is_blocking(&self) -> bool {
        self.reason.is_blocking()
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declared: Vec<String> = self
            .records
            .iter()
            .map(|r| format!("{} ({})", r.constraint, r.source_manifest.display()))
            .collect();
        write!(f, "{}: {} [{}]", self.package, self.reason, declared.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, Version};

    fn record(ecosystem: Ecosystem, version: &str) -> DependencyRecord {
        DependencyRecord::new(
            "requests",
            ecosystem,
            Constraint::exact(Version::parse(version)),
            "requirements.txt",
        )
    }

    #[test]
    fn test_reason_blocking() {
        assert!(ConflictReason::IncompatibleRange.is_blocking());
        assert!(ConflictReason::UnparsableVersion.is_blocking());
        assert!(!ConflictReason::CrossEcosystemAmbiguous.is_blocking());
    }

    #[test]
    fn test_reason_serde_labels() {
        for reason in [
            ConflictReason::IncompatibleRange,
            ConflictReason::UnparsableVersion,
            ConflictReason::CrossEcosystemAmbiguous,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.label()));
        }
    }

    #[test]
    fn test_conflict_ecosystem() {
        let same = Conflict::new(
            "requests",
            vec![
                record(Ecosystem::Python, "2.26.0"),
                record(Ecosystem::Python, "2.28.0"),
            ],
            ConflictReason::IncompatibleRange,
        );
        assert_eq!(same.ecosystem(), Some(Ecosystem::Python));

        let mixed = Conflict::new(
            "requests",
            vec![
                record(Ecosystem::Python, "2.26.0"),
                record(Ecosystem::Rust, "2.28.0"),
            ],
            ConflictReason::CrossEcosystemAmbiguous,
        );
        assert_eq!(mixed.ecosystem(), None);
    }

    #[test]
    fn test_conflict_display() {
        let conflict = Conflict::new(
            "requests",
            vec![
                record(Ecosystem::Python, "2.26.0"),
                record(Ecosystem::Python, "2.28.0"),
            ],
            ConflictReason::IncompatibleRange,
        );
        let text = conflict.to_string();
        assert!(text.starts_with("requests: incompatible version ranges"));
        assert!(text.contains("==2.26.0 (requirements.txt)"));
    }
}
