//! Language analyzers
//!
//! An [`Analyzer`] turns the manifests of one ecosystem into
//! [`DependencyRecord`]s. Each ecosystem is a unit struct that only knows
//! which manifest parser handles which file name; reading, merging and
//! the "missing manifest means no records" rule live in the trait's
//! provided methods.

mod java;
mod javascript;
mod python;
mod registry;
mod rust;

pub use java::JavaAnalyzer;
pub use javascript::JavaScriptAnalyzer;
pub use python::PythonAnalyzer;
pub use registry::AnalyzerRegistry;
pub use rust::RustAnalyzer;

use crate::domain::{push_merged, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{
    read_manifest_blocking, ManifestFile, ManifestParser, DEFAULT_MAX_MANIFEST_BYTES,
};
use std::path::Path;

/// Extracts dependency records for one ecosystem
pub trait Analyzer: Send + Sync {
    /// Returns the ecosystem this analyzer handles
    fn ecosystem(&self) -> Ecosystem;

    /// Parser for a manifest file name, `None` if the name is not one of
    /// this ecosystem's manifests
    fn parser_for(&self, file_name: &str) -> Option<Box<dyn ManifestParser>>;

    /// Analyze manifests already read into memory
    ///
    /// Records from several manifests are kept apart (each carries its own
    /// source); repeated declarations inside one manifest are merged.
    fn analyze_manifests(
        &self,
        manifests: &[ManifestFile],
    ) -> Result<Vec<DependencyRecord>, ManifestError> {
        let mut records = Vec::new();

        for manifest in manifests {
            let parser = self.parser_for(manifest.file_name()).ok_or_else(|| {
                ManifestError::UnsupportedFormat {
                    path: manifest.path.clone(),
                }
            })?;

            let parsed = parser.parse(manifest)?;
            tracing::debug!(
                ecosystem = %self.ecosystem(),
                path = %manifest.path.display(),
                records = parsed.len(),
                "parsed manifest"
            );
            for record in parsed {
                push_merged(&mut records, record);
            }
        }

        Ok(records)
    }

    /// Analyze the manifests of this ecosystem found directly in
    /// `project_root`. No manifest means no records, never an error.
    fn analyze(&self, project_root: &Path) -> Result<Vec<DependencyRecord>, ManifestError> {
        let mut manifests = Vec::new();
        for name in self.ecosystem().manifest_filenames() {
            let path = project_root.join(name);
            if path.is_file() {
                manifests.push(read_manifest_blocking(&path, DEFAULT_MAX_MANIFEST_BYTES)?);
            }
        }
        self.analyze_manifests(&manifests)
    }
}
