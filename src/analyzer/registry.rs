//! Explicit analyzer registry
//!
//! There is no global registration: callers build a registry and hand it
//! to the engine through the analysis configuration.

use super::{Analyzer, JavaAnalyzer, JavaScriptAnalyzer, PythonAnalyzer, RustAnalyzer};
use crate::domain::Ecosystem;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Analyzers keyed by ecosystem, iterated in ecosystem order
#[derive(Clone)]
pub struct AnalyzerRegistry {
    analyzers: BTreeMap<Ecosystem, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            analyzers: BTreeMap::new(),
        }
    }

    /// Register an analyzer, replacing any previous one for its ecosystem
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        self.analyzers.insert(analyzer.ecosystem(), analyzer);
    }

    /// Builder form of [`AnalyzerRegistry::register`]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.register(analyzer);
        self
    }

    /// Keep only the listed ecosystems
    pub fn retain(&mut self, ecosystems: &[Ecosystem]) {
        self.analyzers.retain(|eco, _| ecosystems.contains(eco));
    }

    pub fn get(&self, ecosystem: Ecosystem) -> Option<Arc<dyn Analyzer>> {
        self.analyzers.get(&ecosystem).cloned()
    }

    /// Registered ecosystems in merge order
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        self.analyzers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

impl Default for AnalyzerRegistry {
    /// All built-in analyzers
    fn default() -> Self {
        Self::empty()
            .with_analyzer(Arc::new(PythonAnalyzer))
            .with_analyzer(Arc::new(JavaScriptAnalyzer))
            .with_analyzer(Arc::new(JavaAnalyzer))
            .with_analyzer(Arc::new(RustAnalyzer))
    }
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("ecosystems", &self.ecosystems())
            .finish()
    }
}
