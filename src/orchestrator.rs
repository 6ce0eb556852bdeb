//! Analysis orchestrator coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: detect → read → analyze → merge → detect conflicts → resolve
//! - One tokio task per ecosystem, each with bounded manifest reads
//! - Optional lockfile catalog loading
//! - Error handling with partial continuation: a failed ecosystem is
//!   recorded in the report and the others carry on

use crate::analyzer::Analyzer;
use crate::config::AnalysisConfig;
use crate::domain::{DependencyRecord, Ecosystem, VersionCatalog};
use crate::engine::{build_report, AnalysisReport};
use crate::error::{EcosystemError, IoError, ManifestError};
use crate::manifest::{detect_manifests, load_lockfiles, read_manifests, ManifestInfo, ReadLimits};
use crate::progress::Progress;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Orchestrator for one analysis run
pub struct Orchestrator {
    config: AnalysisConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the analysis without progress display
    pub async fn run(&self, project_root: &Path) -> Result<AnalysisReport, IoError> {
        self.run_with_progress(project_root, false).await
    }

    /// Run the analysis with optional progress display
    ///
    /// Only a missing project directory is an error; everything that goes
    /// wrong inside an ecosystem ends up in the report.
    pub async fn run_with_progress(
        &self,
        project_root: &Path,
        show_progress: bool,
    ) -> Result<AnalysisReport, IoError> {
        if !project_root.is_dir() {
            return Err(IoError::directory_not_found(project_root));
        }

        let mut progress = Progress::new(show_progress);

        // Step 1: Detect manifest files
        progress.spinner("Detecting manifest files...");
        let detected = self.group_manifests(detect_manifests(project_root));
        progress.finish_and_clear();

        // Step 2: Analyze each ecosystem in its own task
        let ecosystems = self.config.registry.ecosystems();
        progress.start(ecosystems.len() as u64, "Analyzing ecosystems");

        let mut partials = BTreeMap::new();
        let mut handles = Vec::new();
        for ecosystem in ecosystems {
            let Some(analyzer) = self.config.registry.get(ecosystem) else {
                continue;
            };
            match detected.get(&ecosystem) {
                Some(manifests) => {
                    let task = analyze_ecosystem(analyzer, manifests.clone(), self.config.limits);
                    handles.push((ecosystem, tokio::spawn(task)));
                }
                None => {
                    // No manifest means no records
                    partials.insert(ecosystem, Vec::new());
                    progress.inc();
                }
            }
        }

        let catalog = self.load_catalog(project_root).await;

        let mut errors = Vec::new();
        for (ecosystem, handle) in handles {
            progress.set_message(&format!("Analyzing {}", ecosystem.display_name()));
            match handle.await {
                Ok(Ok(records)) => {
                    partials.insert(ecosystem, records);
                }
                Ok(Err(error)) => {
                    tracing::warn!(%ecosystem, %error, "ecosystem analysis failed");
                    errors.push(EcosystemError::new(ecosystem, error));
                }
                Err(error) => {
                    // A panicked task still fails its ecosystem in the report
                    tracing::error!(%ecosystem, %error, "analysis task did not complete");
                    let path = detected
                        .get(&ecosystem)
                        .and_then(|manifests| manifests.first())
                        .map(|info| info.path.clone())
                        .unwrap_or_else(|| project_root.to_path_buf());
                    errors.push(EcosystemError::new(
                        ecosystem,
                        ManifestError::Aborted {
                            path,
                            message: error.to_string(),
                        },
                    ));
                }
            }
            progress.inc();
        }
        progress.finish_and_clear();

        // Step 3: Merge, detect and resolve
        progress.spinner("Resolving versions...");
        let report = build_report(
            project_root.to_path_buf(),
            partials,
            errors,
            &catalog,
            &self.config.aliases,
        );
        progress.finish_and_clear();

        Ok(report)
    }

    /// Detected manifests of registered ecosystems, grouped per ecosystem
    fn group_manifests(&self, detected: Vec<ManifestInfo>) -> BTreeMap<Ecosystem, Vec<ManifestInfo>> {
        let mut grouped: BTreeMap<Ecosystem, Vec<ManifestInfo>> = BTreeMap::new();
        for info in detected {
            if self.config.registry.get(info.ecosystem).is_some() {
                grouped.entry(info.ecosystem).or_default().push(info);
            }
        }
        grouped
    }

    async fn load_catalog(&self, project_root: &Path) -> VersionCatalog {
        if !self.config.use_lockfiles {
            return VersionCatalog::new();
        }

        let root = project_root.to_path_buf();
        match tokio::task::spawn_blocking(move || load_lockfiles(&root)).await {
            Ok(catalog) => catalog,
            Err(error) => {
                tracing::warn!(%error, "lockfile loading did not complete");
                VersionCatalog::new()
            }
        }
    }
}

/// Read and analyze one ecosystem's manifests
async fn analyze_ecosystem(
    analyzer: Arc<dyn Analyzer>,
    manifests: Vec<ManifestInfo>,
    limits: ReadLimits,
) -> Result<Vec<DependencyRecord>, ManifestError> {
    let files = read_manifests(&manifests, limits).await?;
    analyzer.analyze_manifests(&files)
}
