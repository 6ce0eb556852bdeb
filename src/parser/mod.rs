//! Constraint parsers for each package ecosystem
//!
//! Each parser turns the version text of one manifest entry into a
//! [`Constraint`]:
//! - Python (pip/poetry, PEP 440)
//! - JavaScript (npm semver ranges)
//! - Java (Maven versions and ranges, Gradle dynamic versions)
//! - Rust (cargo)
//!
//! Parsing never fails. Syntax that cannot be expressed as a conjunction of
//! comparators becomes an exact pin on a fallback version, which the
//! detector later reports as unparsable.

mod java;
mod javascript;
mod python;
mod rust;

pub use java::JavaConstraintParser;
pub use javascript::JavaScriptConstraintParser;
pub use python::{normalize_name as normalize_python_name, PythonConstraintParser};
pub use rust::RustConstraintParser;

use crate::domain::{Comparator, Constraint, Ecosystem, Operator, Version};
use regex::Regex;
use std::sync::LazyLock;

/// Trait for parsing version constraints
pub trait ConstraintParser: Send + Sync {
    /// Parse the version text of one manifest entry
    fn parse(&self, raw: &str) -> Constraint;

    /// Returns the ecosystem this parser handles
    fn ecosystem(&self) -> Ecosystem;
}

/// Get a constraint parser for the specified ecosystem
pub fn get_parser(ecosystem: Ecosystem) -> Box<dyn ConstraintParser> {
    match ecosystem {
        Ecosystem::Python => Box::new(PythonConstraintParser),
        Ecosystem::JavaScript => Box::new(JavaScriptConstraintParser),
        Ecosystem::Java => Box::new(JavaConstraintParser),
        Ecosystem::Rust => Box::new(RustConstraintParser),
    }
}

// 1, 1.2, 1.x, 1.2.*, with an optional v prefix
static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?(\d+)(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?$").unwrap()
});

/// How many release components a declared version spelled out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Precision {
    /// `1`, `1.x`, `1.*`
    Major,
    /// `1.2`, `1.2.x`
    Minor,
    /// A complete version, or anything that is not a numeric partial
    Patch,
}

/// Parse a possibly partial version, padding missing components with zero
pub(crate) fn partial(text: &str) -> (Version, Precision) {
    let text = text.trim();
    if let Some(caps) = PARTIAL_RE.captures(text) {
        let numeric = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str())
                .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        };
        let major = &caps[1];
        match (numeric(2), numeric(3)) {
            (Some(_), Some(_)) => return (Version::parse(text), Precision::Patch),
            (Some(minor), None) => {
                return (
                    Version::parse(&format!("{major}.{minor}.0")),
                    Precision::Minor,
                )
            }
            (None, _) => return (Version::parse(&format!("{major}.0.0")), Precision::Major),
        }
    }
    (Version::parse(text), Precision::Patch)
}

fn next_floor(version: &Version, precision: Precision) -> Option<Version> {
    match precision {
        Precision::Major => version.next_major_floor(),
        Precision::Minor => version.next_minor_floor(),
        Precision::Patch => None,
    }
}

/// Every version matching a partial: `1.2` covers `>=1.2.0, <1.3.0-0`
pub(crate) fn span(version: Version, precision: Precision) -> Vec<Comparator> {
    match next_floor(&version, precision) {
        Some(upper) => vec![
            Comparator::new(Operator::GreaterOrEqual, version),
            Comparator::new(Operator::Less, upper),
        ],
        None => vec![Comparator::new(Operator::Exact, version)],
    }
}

/// Comparators for `op` applied to a possibly partial version
pub(crate) fn comparators_for(
    op: Operator,
    version: Version,
    precision: Precision,
) -> Vec<Comparator> {
    let upper = next_floor(&version, precision);
    match (op, upper) {
        (Operator::Exact, _) => span(version, precision),
        (Operator::LessOrEqual, Some(upper)) => vec![Comparator::new(Operator::Less, upper)],
        (Operator::Greater, Some(upper)) => {
            vec![Comparator::new(Operator::GreaterOrEqual, upper)]
        }
        (Operator::Caret, Some(upper))
            if precision == Precision::Major || version.major() == Some(0) =>
        {
            vec![
                Comparator::new(Operator::GreaterOrEqual, version),
                Comparator::new(Operator::Less, upper),
            ]
        }
        (Operator::Tilde, Some(_)) if precision == Precision::Major => span(version, precision),
        (op, _) => vec![Comparator::new(op, version)],
    }
}

/// Exact pin on the raw text, for syntax no comparator can express
pub(crate) fn opaque(raw: &str) -> Constraint {
    let raw = raw.trim();
    Constraint::exact(Version::Fallback(raw.to_string())).with_raw(raw)
}
