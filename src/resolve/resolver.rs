//! Version selection per (package, ecosystem)
//!
//! Blocking conflicts leave a package unresolved with the conflict
//! attached. Otherwise an exact pin wins; failing that, the highest
//! candidate that satisfies every declaration. Candidates are the versions
//! the declarations themselves mention plus whatever the catalog knows, so
//! a version is never invented.

use super::detector::{group_name, is_satisfiable};
use crate::domain::{
    CanonicalGraph, Conflict, ConflictReason, DependencyRecord, Ecosystem, Operator, Resolution,
    ResolutionResult, ResolvedPackage, Version, VersionCatalog,
};
use std::cmp::Ordering;

/// Resolve every (package, ecosystem) group of `graph`
pub fn resolve(
    graph: &CanonicalGraph,
    conflicts: &[Conflict],
    catalog: &VersionCatalog,
) -> ResolutionResult {
    let mut result = ResolutionResult::new();

    for entry in graph.packages() {
        for (ecosystem, records) in entry.by_ecosystem() {
            let package = group_name(&entry.name, &records);
            let resolution = resolve_group(&package, ecosystem, &records, conflicts, catalog);

            match &resolution {
                Resolution::Resolved(version) => {
                    tracing::debug!(%package, %ecosystem, %version, "resolved");
                }
                Resolution::Unresolved(conflict) => {
                    tracing::debug!(%package, %ecosystem, reason = conflict.reason.label(), "unresolved");
                }
            }

            result.push(ResolvedPackage {
                package,
                ecosystem,
                resolution,
                records: records.into_iter().cloned().collect(),
            });
        }
    }

    result
}

fn resolve_group(
    package: &str,
    ecosystem: Ecosystem,
    records: &[&DependencyRecord],
    conflicts: &[Conflict],
    catalog: &VersionCatalog,
) -> Resolution {
    if let Some(conflict) = conflicts.iter().find(|c| {
        c.is_blocking() && c.package == package && c.ecosystem() == Some(ecosystem)
    }) {
        return Resolution::Unresolved(conflict.clone());
    }

    let no_candidate = || {
        Resolution::Unresolved(Conflict::new(
            package,
            records.iter().copied().cloned().collect(),
            ConflictReason::IncompatibleRange,
        ))
    };

    // A group that got past detection unchecked may still disagree
    if !is_satisfiable(records) {
        return no_candidate();
    }

    if let Some(pin) = records.iter().flat_map(|r| r.constraint.pins()).next() {
        return Resolution::Resolved(pin.clone());
    }

    match best_candidate(records, &candidates(ecosystem, records, catalog)) {
        Some(version) => Resolution::Resolved(version.clone()),
        None => no_candidate(),
    }
}

/// Declared semantic operands followed by catalog versions
///
/// The `X.Y.Z-0` floors that partial-version ranges expand to are bounds,
/// not releases, and are left out, as are `!=` operands.
fn candidates(
    ecosystem: Ecosystem,
    records: &[&DependencyRecord],
    catalog: &VersionCatalog,
) -> Vec<Version> {
    let declared = records
        .iter()
        .flat_map(|r| r.constraint.comparators.iter())
        .filter(|c| c.op != Operator::NotEqual)
        .map(|c| &c.version)
        .filter(|v| v.is_semantic() && !v.is_floor())
        .cloned();

    let mut names: Vec<&str> = Vec::new();
    for record in records {
        if !names.contains(&record.name.as_str()) {
            names.push(&record.name);
        }
    }
    let known = names
        .into_iter()
        .flat_map(|name| catalog.versions(ecosystem, name).iter())
        .filter(|v| v.is_semantic())
        .cloned();

    declared.chain(known).collect()
}

/// Highest candidate satisfying every record; the first one wins a tie
fn best_candidate<'a>(
    records: &[&DependencyRecord],
    candidates: &'a [Version],
) -> Option<&'a Version> {
    candidates
        .iter()
        .filter(|v| records.iter().all(|r| r.constraint.satisfies(v)))
        .fold(None, |best, v| match best {
            Some(b) if v.cmp_version(b) != Ordering::Greater => Some(b),
            _ => Some(v),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comparator, Constraint};
    use crate::parser::{ConstraintParser, PythonConstraintParser};
    use crate::resolve::detect;

    fn record(name: &str, ecosystem: Ecosystem, constraint: Constraint, manifest: &str) -> DependencyRecord {
        DependencyRecord::new(name, ecosystem, constraint, manifest)
    }

    fn c(op: Operator, version: &str) -> Constraint {
        Constraint::new(op, Version::parse(version))
    }

    fn run(graph: &CanonicalGraph, catalog: &VersionCatalog) -> ResolutionResult {
        resolve(graph, &detect(graph), catalog)
    }

    #[test]
    fn test_pin_wins() {
        let graph = CanonicalGraph::from_records(vec![
            record("requests", Ecosystem::Python, c(Operator::Exact, "2.28.0"), "requirements.txt"),
            record("requests", Ecosystem::Python, c(Operator::GreaterOrEqual, "2.0"), "pyproject.toml"),
        ]);
        let catalog = VersionCatalog::new().with(Ecosystem::Python, "requests", "2.31.0");

        let result = run(&graph, &catalog);
        assert_eq!(
            result.version_of("requests", Ecosystem::Python).unwrap().to_string(),
            "2.28.0"
        );
    }

    #[test]
    fn test_highest_satisfying_candidate() {
        let graph = CanonicalGraph::from_records(vec![
            record("lodash", Ecosystem::JavaScript, c(Operator::Caret, "4.0.0"), "a/package.json"),
            record("lodash", Ecosystem::JavaScript, c(Operator::GreaterOrEqual, "4.17.0"), "b/package.json"),
        ]);

        // Declared operands alone: 4.0.0 fails >=4.17.0, 4.17.0 satisfies both
        let result = run(&graph, &VersionCatalog::new());
        assert_eq!(
            result.version_of("lodash", Ecosystem::JavaScript).unwrap().to_string(),
            "4.17.0"
        );

        let catalog = VersionCatalog::new()
            .with(Ecosystem::JavaScript, "lodash", "4.17.21")
            .with(Ecosystem::JavaScript, "lodash", "5.0.0");
        let result = run(&graph, &catalog);
        assert_eq!(
            result.version_of("lodash", Ecosystem::JavaScript).unwrap().to_string(),
            "4.17.21"
        );
    }

    #[test]
    fn test_no_candidate_is_unresolved() {
        let graph = CanonicalGraph::from_records(vec![record(
            "lodash",
            Ecosystem::JavaScript,
            c(Operator::Greater, "4.17.0"),
            "package.json",
        )]);

        let result = run(&graph, &VersionCatalog::new());
        let entry = result.get("lodash", Ecosystem::JavaScript).unwrap();
        let conflict = entry.resolution.conflict().unwrap();
        assert_eq!(conflict.reason, ConflictReason::IncompatibleRange);
        assert_eq!(conflict.records.len(), 1);
    }

    #[test]
    fn test_excluded_pin_is_unresolved() {
        let graph = CanonicalGraph::from_records(vec![
            record("requests", Ecosystem::Python, c(Operator::Exact, "2.28.0"), "requirements.txt"),
            record("requests", Ecosystem::Python, c(Operator::NotEqual, "2.28.0"), "pyproject.toml"),
        ]);

        let result = run(&graph, &VersionCatalog::new());
        let entry = result.get("requests", Ecosystem::Python).unwrap();
        assert_eq!(
            entry.resolution.conflict().unwrap().reason,
            ConflictReason::IncompatibleRange
        );
    }

    #[test]
    fn test_excluded_operand_is_never_chosen() {
        let flask = PythonConstraintParser.parse(">=2.0,!=2.0");
        let graph = CanonicalGraph::from_records(vec![record(
            "flask",
            Ecosystem::Python,
            flask,
            "requirements.txt",
        )]);

        // 2.0 is the only declared operand and it is excluded
        let result = run(&graph, &VersionCatalog::new());
        assert!(!result.is_fully_resolved());

        let catalog = VersionCatalog::new()
            .with(Ecosystem::Python, "flask", "2.0.0")
            .with(Ecosystem::Python, "flask", "2.0.1");
        let result = run(&graph, &catalog);
        assert_eq!(
            result.version_of("flask", Ecosystem::Python).unwrap().to_string(),
            "2.0.1"
        );

        let catalog = VersionCatalog::new().with(Ecosystem::Python, "flask", "2.0.0");
        let result = run(&graph, &catalog);
        assert!(!result.is_fully_resolved());
    }

    #[test]
    fn test_floors_are_not_candidates() {
        let range = Constraint::all_of(
            "1.x",
            vec![
                Comparator::new(Operator::GreaterOrEqual, Version::parse("1.0.0")),
                Comparator::new(Operator::Less, Version::new(2, 0, 0).next_major_floor().unwrap()),
            ],
        );
        let higher = Constraint::new(
            Operator::GreaterOrEqual,
            Version::new(1, 0, 0).next_minor_floor().unwrap(),
        );
        let graph = CanonicalGraph::from_records(vec![
            record("x", Ecosystem::JavaScript, range, "a"),
            record("x", Ecosystem::JavaScript, higher, "b"),
        ]);

        // 1.1.0-0 would satisfy both but is only a bound
        let result = run(&graph, &VersionCatalog::new());
        assert!(!result.get("x", Ecosystem::JavaScript).unwrap().resolution.is_resolved());
    }

    #[test]
    fn test_blocking_conflict_is_attached() {
        let graph = CanonicalGraph::from_records(vec![
            record("requests", Ecosystem::Python, c(Operator::Exact, "2.28.0"), "a"),
            record("requests", Ecosystem::Python, c(Operator::Exact, "2.31.0"), "b"),
        ]);
        let conflicts = detect(&graph);

        let result = resolve(&graph, &conflicts, &VersionCatalog::new());
        let entry = result.get("requests", Ecosystem::Python).unwrap();
        assert_eq!(entry.resolution.conflict(), Some(&conflicts[0]));
        assert!(!result.is_fully_resolved());
    }

    #[test]
    fn test_unparsable_is_unresolved() {
        let graph = CanonicalGraph::from_records(vec![record(
            "next",
            Ecosystem::JavaScript,
            c(Operator::Exact, "latest"),
            "package.json",
        )]);

        let result = run(&graph, &VersionCatalog::new());
        let conflict = result.entries()[0].resolution.conflict().unwrap();
        assert_eq!(conflict.reason, ConflictReason::UnparsableVersion);
    }

    #[test]
    fn test_cross_ecosystem_copies_resolve_independently() {
        let graph = CanonicalGraph::from_records(vec![
            record("protobuf", Ecosystem::Python, c(Operator::Exact, "4.25.0"), "requirements.txt"),
            record("protobuf", Ecosystem::JavaScript, c(Operator::Exact, "7.2.0"), "package.json"),
        ]);

        let result = run(&graph, &VersionCatalog::new());
        assert_eq!(result.len(), 2);
        assert!(result.is_fully_resolved());
        assert_eq!(
            result.version_of("protobuf", Ecosystem::Python).unwrap().to_string(),
            "4.25.0"
        );
        assert_eq!(
            result.version_of("protobuf", Ecosystem::JavaScript).unwrap().to_string(),
            "7.2.0"
        );
    }

    #[test]
    fn test_unconstrained_without_catalog_is_unresolved() {
        let graph = CanonicalGraph::from_records(vec![record(
            "flask",
            Ecosystem::Python,
            Constraint::any(),
            "requirements.txt",
        )]);

        let result = run(&graph, &VersionCatalog::new());
        assert_eq!(result.unresolved_count(), 1);

        let catalog = VersionCatalog::new().with(Ecosystem::Python, "flask", "3.0.0");
        let result = run(&graph, &catalog);
        assert_eq!(
            result.version_of("flask", Ecosystem::Python).unwrap().to_string(),
            "3.0.0"
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let graph = CanonicalGraph::from_records(vec![
            record("lodash", Ecosystem::JavaScript, c(Operator::Caret, "4.0.0"), "a"),
            record("lodash", Ecosystem::JavaScript, c(Operator::GreaterOrEqual, "4.17.0"), "b"),
            record("serde", Ecosystem::Rust, c(Operator::Caret, "1.0.150"), "Cargo.toml"),
        ]);
        let catalog = VersionCatalog::new().with(Ecosystem::JavaScript, "lodash", "4.17.21");
        let first = run(&graph, &catalog);

        let pinned = CanonicalGraph::from_records(first.installable().map(|(name, eco, version)| {
            record(name, eco, Constraint::exact(version.clone()), "resolved")
        }));
        let second = run(&pinned, &VersionCatalog::new());

        let versions = |r: &ResolutionResult| {
            r.installable()
                .map(|(n, e, v)| (n.to_string(), e, v.to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(versions(&first), versions(&second));
    }
}
