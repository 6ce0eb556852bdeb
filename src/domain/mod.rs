//! Core domain models for polydep
//!
//! This module contains the canonical dependency model shared by every
//! analyzer and by the detection/resolution engine:
//! - Ecosystem identifiers
//! - The two-tier version model and version constraints
//! - Dependency records and the canonical graph
//! - Conflicts and resolution results
//! - The catalog of known concrete versions

mod catalog;
mod conflict;
mod constraint;
mod ecosystem;
mod graph;
mod record;
mod resolution;
mod version;

pub use catalog::VersionCatalog;
pub use conflict::{Conflict, ConflictReason};
pub use constraint::{satisfies, Comparator, Constraint, Operator};
pub use ecosystem::Ecosystem;
pub use graph::{AliasTable, CanonicalGraph, PackageEntry};
pub use record::{push_merged, DependencyRecord};
pub use resolution::{
    Resolution, ResolutionRecord, ResolutionResult, ResolvedPackage, SourceRecord,
};
pub use version::{Comparison, Confidence, Version};
