//! Canonical dependency graph
//!
//! Maps a package name to every record that declares it, in insertion
//! order, so that conflict reporting is deterministic.

use super::{DependencyRecord, Ecosystem};
use std::collections::{BTreeMap, HashMap};

/// Cross-ecosystem aliases: `(ecosystem, declared name)` to graph key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<(Ecosystem, String), String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` in `ecosystem` as an alias of `canonical`
    pub fn insert(
        &mut self,
        ecosystem: Ecosystem,
        name: impl Into<String>,
        canonical: impl Into<String>,
    ) {
        self.entries.insert((ecosystem, name.into()), canonical.into());
    }

    /// Builder form of [`AliasTable::insert`]
    pub fn with(
        mut self,
        ecosystem: Ecosystem,
        name: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Self {
        self.insert(ecosystem, name, canonical);
        self
    }

    /// The graph key a declaration maps to
    pub fn canonical_name<'a>(&'a self, ecosystem: Ecosystem, name: &'a str) -> &'a str {
        self.entries
            .get(&(ecosystem, name.to_string()))
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All records declaring one package, under its graph key
#[derive(Debug, Clone, PartialEq)]
pub struct PackageEntry {
    pub name: String,
    pub records: Vec<DependencyRecord>,
}

impl PackageEntry {
    /// Records split by ecosystem, in order of first appearance
    pub fn by_ecosystem(&self) -> Vec<(Ecosystem, Vec<&DependencyRecord>)> {
        let mut groups: Vec<(Ecosystem, Vec<&DependencyRecord>)> = Vec::new();
        for record in &self.records {
            match groups.iter_mut().find(|(eco, _)| *eco == record.ecosystem) {
                Some((_, group)) => group.push(record),
                None => groups.push((record.ecosystem, vec![record])),
            }
        }
        groups
    }

    /// Distinct ecosystems declaring this package
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        self.by_ecosystem().into_iter().map(|(eco, _)| eco).collect()
    }
}

/// Name-keyed multigraph of dependency records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalGraph {
    packages: Vec<PackageEntry>,
    index: HashMap<String, usize>,
}

impl CanonicalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from records, keyed by their declared names
    pub fn from_records(records: impl IntoIterator<Item = DependencyRecord>) -> Self {
        Self::from_records_with_aliases(records, &AliasTable::default())
    }

    /// Build a graph from records, mapping names through `aliases`
    pub fn from_records_with_aliases(
        records: impl IntoIterator<Item = DependencyRecord>,
        aliases: &AliasTable,
    ) -> Self {
        let mut graph = Self::new();
        for record in records {
            let key = aliases
                .canonical_name(record.ecosystem, &record.name)
                .to_string();
            graph.insert_as(key, record);
        }
        graph
    }

    /// Merge per-ecosystem partial results: ecosystem order first, then
    /// insertion order within each ecosystem
    pub fn merge(
        partials: BTreeMap<Ecosystem, Vec<DependencyRecord>>,
        aliases: &AliasTable,
    ) -> Self {
        Self::from_records_with_aliases(partials.into_values().flatten(), aliases)
    }

    /// Insert a record under its declared name
    pub fn insert(&mut self, record: DependencyRecord) {
        let key = record.name.clone();
        self.insert_as(key, record);
    }

    fn insert_as(&mut self, key: String, record: DependencyRecord) {
        match self.index.get(&key) {
            Some(&i) => self.packages[i].records.push(record),
            None => {
                self.index.insert(key.clone(), self.packages.len());
                self.packages.push(PackageEntry {
                    name: key,
                    records: vec![record],
                });
            }
        }
    }

    /// Records for a package name
    pub fn get(&self, name: &str) -> Option<&[DependencyRecord]> {
        self.index
            .get(name)
            .map(|&i| self.packages[i].records.as_slice())
    }

    /// Packages in first-appearance order
    pub fn packages(&self) -> impl Iterator<Item = &PackageEntry> {
        self.packages.iter()
    }

    /// Every record in graph order
    pub fn records(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.packages.iter().flat_map(|p| p.records.iter())
    }

    /// Number of distinct package names
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Total number of records
    pub fn record_count(&self) -> usize {
        self.packages.iter().map(|p| p.records.len()).sum()
    }
}
