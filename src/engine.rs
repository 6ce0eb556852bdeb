//! Analysis core: manifests in, report out
//!
//! The engine is synchronous and never fails as a whole. A manifest that
//! cannot be parsed fails its ecosystem only; that failure is recorded in
//! the report and every other ecosystem continues.

use crate::analyzer::AnalyzerRegistry;
use crate::domain::{
    AliasTable, CanonicalGraph, Conflict, ConflictReason, DependencyRecord, Ecosystem,
    ResolutionResult, VersionCatalog,
};
use crate::error::EcosystemError;
use crate::manifest::ManifestFile;
use crate::resolve::{detect, resolve};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Manifests to analyze, grouped by ecosystem
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub project_root: PathBuf,
    pub manifests: BTreeMap<Ecosystem, Vec<ManifestFile>>,
    /// Known concrete versions, usually from lockfiles
    pub catalog: VersionCatalog,
    pub aliases: AliasTable,
}

impl AnalysisRequest {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    pub fn with_manifest(mut self, ecosystem: Ecosystem, manifest: ManifestFile) -> Self {
        self.manifests.entry(ecosystem).or_default().push(manifest);
        self
    }

    pub fn with_catalog(mut self, catalog: VersionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Result of one analysis run
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub project_root: PathBuf,
    /// Ecosystems that were analyzed successfully
    pub analyzed: Vec<Ecosystem>,
    pub graph: CanonicalGraph,
    pub conflicts: Vec<Conflict>,
    pub resolution: ResolutionResult,
    pub errors: Vec<EcosystemError>,
}

impl AnalysisReport {
    /// Returns true if some ecosystem failed to analyze
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Records contributed by one ecosystem
    pub fn records_for(&self, ecosystem: Ecosystem) -> Vec<&DependencyRecord> {
        self.graph
            .records()
            .filter(|r| r.ecosystem == ecosystem)
            .collect()
    }

    /// Conflicts of one kind
    pub fn conflicts_with(&self, reason: ConflictReason) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.reason == reason)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut records_by_ecosystem = BTreeMap::new();
        for ecosystem in &self.analyzed {
            records_by_ecosystem.insert(*ecosystem, 0);
        }
        for record in self.graph.records() {
            *records_by_ecosystem.entry(record.ecosystem).or_insert(0) += 1;
        }

        ReportSummary {
            records_by_ecosystem,
            packages: self.graph.len(),
            resolved: self.resolution.resolved_count(),
            unresolved: self.resolution.unresolved_count(),
            conflicts: ConflictCounts {
                incompatible_range: self.conflicts_with(ConflictReason::IncompatibleRange).count(),
                unparsable_version: self.conflicts_with(ConflictReason::UnparsableVersion).count(),
                cross_ecosystem_ambiguous: self
                    .conflicts_with(ConflictReason::CrossEcosystemAmbiguous)
                    .count(),
            },
            failed_ecosystems: self.errors.len(),
        }
    }
}

/// Counts shown at the end of a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub records_by_ecosystem: BTreeMap<Ecosystem, usize>,
    pub packages: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub conflicts: ConflictCounts,
    pub failed_ecosystems: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictCounts {
    pub incompatible_range: usize,
    pub unparsable_version: usize,
    pub cross_ecosystem_ambiguous: usize,
}

impl ConflictCounts {
    pub fn total(&self) -> usize {
        self.incompatible_range + self.unparsable_version + self.cross_ecosystem_ambiguous
    }
}

/// Run every registered analyzer over the request's manifests, then detect
/// and resolve
///
/// Ecosystems without a registered analyzer are skipped.
pub fn analyze(request: AnalysisRequest, registry: &AnalyzerRegistry) -> AnalysisReport {
    let mut partials = BTreeMap::new();
    let mut errors = Vec::new();

    for (ecosystem, manifests) in &request.manifests {
        let Some(analyzer) = registry.get(*ecosystem) else {
            tracing::debug!(%ecosystem, "no analyzer registered, skipping");
            continue;
        };

        match analyzer.analyze_manifests(manifests) {
            Ok(records) => {
                partials.insert(*ecosystem, records);
            }
            Err(error) => {
                tracing::warn!(%ecosystem, %error, "ecosystem analysis failed");
                errors.push(EcosystemError::new(*ecosystem, error));
            }
        }
    }

    build_report(
        request.project_root,
        partials,
        errors,
        &request.catalog,
        &request.aliases,
    )
}

/// Merge per-ecosystem record lists and run detection and resolution
///
/// Records are merged in ecosystem order, then insertion order, so the
/// outcome does not depend on which analysis finished first.
pub fn build_report(
    project_root: PathBuf,
    partials: BTreeMap<Ecosystem, Vec<DependencyRecord>>,
    errors: Vec<EcosystemError>,
    catalog: &VersionCatalog,
    aliases: &AliasTable,
) -> AnalysisReport {
    let analyzed = partials.keys().copied().collect();

    let graph = CanonicalGraph::merge(partials, aliases);

    let conflicts = detect(&graph);
    let resolution = resolve(&graph, &conflicts, catalog);

    tracing::debug!(
        packages = graph.len(),
        records = graph.record_count(),
        conflicts = conflicts.len(),
        unresolved = resolution.unresolved_count(),
        "analysis finished"
    );

    AnalysisReport {
        project_root,
        analyzed,
        graph,
        conflicts,
        resolution,
        errors,
    }
}
