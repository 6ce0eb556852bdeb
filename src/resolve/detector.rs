//! Conflict detection over the canonical graph
//!
//! Handles:
//! - Unparsable versions: any record with a fallback operand
//! - Incompatible ranges: pins that disagree with each other or with the
//!   ranges declared next to them, and ranges with an empty intersection
//! - Cross-ecosystem ambiguity: one name declared under several
//!   ecosystems (informational)
//!
//! Output order follows the graph, so repeated runs over the same input
//! produce identical conflict lists.

use super::interval::Interval;
use crate::domain::{CanonicalGraph, Conflict, ConflictReason, DependencyRecord, Ecosystem};

/// Detect every conflict in `graph`
pub fn detect(graph: &CanonicalGraph) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for entry in graph.packages() {
        let groups = entry.by_ecosystem();

        for (ecosystem, records) in &groups {
            let package = group_name(&entry.name, records);
            conflicts.extend(detect_in_group(&package, *ecosystem, records));
        }

        if groups.len() > 1 {
            tracing::debug!(
                package = %entry.name,
                ecosystems = groups.len(),
                "package declared in several ecosystems"
            );
            conflicts.push(Conflict::new(
                entry.name.clone(),
                entry.records.clone(),
                ConflictReason::CrossEcosystemAmbiguous,
            ));
        }
    }

    conflicts
}

/// Name reported for one ecosystem's records of a graph entry
///
/// Aliased records keep their declared names, so the declared name is used
/// whenever the group agrees on one; otherwise the graph key.
pub(crate) fn group_name(key: &str, records: &[&DependencyRecord]) -> String {
    match records.split_first() {
        Some((first, rest)) if rest.iter().all(|r| r.name == first.name) => first.name.clone(),
        _ => key.to_string(),
    }
}

fn detect_in_group(
    package: &str,
    ecosystem: Ecosystem,
    records: &[&DependencyRecord],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    let (unparsable, parseable): (Vec<&DependencyRecord>, Vec<&DependencyRecord>) = records
        .iter()
        .copied()
        .partition(|r| r.constraint.has_fallback());

    if !unparsable.is_empty() {
        tracing::debug!(%package, %ecosystem, "unparsable version declared");
        conflicts.push(Conflict::new(
            package,
            unparsable.into_iter().cloned().collect(),
            ConflictReason::UnparsableVersion,
        ));
    }

    if !is_satisfiable(&parseable) {
        tracing::debug!(%package, %ecosystem, "declared constraints cannot all hold");
        conflicts.push(Conflict::new(
            package,
            parseable.into_iter().cloned().collect(),
            ConflictReason::IncompatibleRange,
        ));
    }

    conflicts
}

/// Returns true if some version could satisfy every record
///
/// With a pin present, the pin itself must satisfy every constraint (two
/// different pins, or a pin another manifest excludes, therefore always
/// fail). Without one, the ranges must intersect, and a range that narrows
/// to one version must not exclude it.
pub(crate) fn is_satisfiable(records: &[&DependencyRecord]) -> bool {
    let mut pins = records.iter().flat_map(|r| r.constraint.pins());
    match pins.next() {
        Some(pin) => records.iter().all(|r| r.constraint.satisfies(pin)),
        None => {
            let comparators = records.iter().flat_map(|r| r.constraint.comparators.iter());
            let interval = Interval::from_comparators(comparators);
            if interval.is_empty() {
                return false;
            }
            match interval.single_point() {
                Some(point) => records.iter().all(|r| r.constraint.satisfies(point)),
                None => true,
            }
        }
    }
}
