//! Python (pip/poetry) constraint parser
//!
//! Handles version formats:
//! - Exact: `==1.2.3`, `===1.2.3`
//! - Wildcard: `*`, `==1.2.*`
//! - Caret: `^1.2.3` (Poetry)
//! - Tilde: `~1.2.3` (Poetry)
//! - Compatible release: `~=1.4.5`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Exclusion: `!=1.2.3` (`!=1.2.*` is kept opaque)
//! - Conjunction: `>=1.0,<2.0`

use super::{comparators_for, opaque, partial, span, ConstraintParser, Precision};
use crate::domain::{Comparator, Constraint, Ecosystem, Operator, Version};
use regex::Regex;
use std::sync::LazyLock;

/// Python constraint parser
pub struct PythonConstraintParser;

static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(===|==|~=|!=|>=|<=|>|<|\^|~)?\s*([0-9A-Za-z][0-9A-Za-z.*+!_-]*)$").unwrap()
});
static NAME_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Normalize a Python distribution name (PEP 503)
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATOR_RE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

impl PythonConstraintParser {
    fn clause(op: &str, version: &str) -> Option<Vec<Comparator>> {
        if version.contains('*') {
            // Only == and bare text accept a trailing wildcard; `!=1.2.*`
            // is a union and stays opaque
            if !matches!(op, "" | "==") || !version.ends_with(".*") {
                return None;
            }
            let (base, precision) = partial(version);
            return (precision != Precision::Patch).then(|| span(base, precision));
        }

        let parsed = Version::parse(version);
        let comparators = match op {
            "" | "==" | "===" => vec![Comparator::new(Operator::Exact, parsed)],
            "!=" => vec![Comparator::new(Operator::NotEqual, parsed)],
            ">=" => vec![Comparator::new(Operator::GreaterOrEqual, parsed)],
            "<=" => vec![Comparator::new(Operator::LessOrEqual, parsed)],
            ">" => vec![Comparator::new(Operator::Greater, parsed)],
            // `<V` leaves out the pre-releases of V unless V is one
            "<" => {
                let bound = parsed.release_floor().unwrap_or(parsed);
                vec![Comparator::new(Operator::Less, bound)]
            }
            "^" => {
                let (base, precision) = partial(version);
                comparators_for(Operator::Caret, base, precision)
            }
            "~" => {
                let (base, precision) = partial(version);
                comparators_for(Operator::Tilde, base, precision)
            }
            "~=" => Self::compatible_release(version, parsed),
            _ => return None,
        };
        Some(comparators)
    }

    /// `~=X.Y` is `>=X.Y, ==X.*`; `~=X.Y.Z` is `>=X.Y.Z, ==X.Y.*`
    fn compatible_release(text: &str, version: Version) -> Vec<Comparator> {
        let release_parts = text
            .split(['a', 'b', 'r', '-', '+'])
            .next()
            .map(|release| release.split('.').count())
            .unwrap_or(0);
        let upper = match release_parts {
            2 => version.next_major_floor(),
            n if n >= 3 => version.next_minor_floor(),
            _ => None,
        };
        let mut comparators = vec![Comparator::new(Operator::GreaterOrEqual, version)];
        if let Some(upper) = upper {
            comparators.push(Comparator::new(Operator::Less, upper));
        }
        comparators
    }
}

impl ConstraintParser for PythonConstraintParser {
    fn parse(&self, raw: &str) -> Constraint {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed == "*" {
            return Constraint::any();
        }

        let mut comparators = Vec::new();
        for clause in trimmed.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let Some(caps) = CLAUSE_RE.captures(clause) else {
                return opaque(trimmed);
            };
            let op = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            match Self::clause(op, &caps[2]) {
                Some(parsed) => comparators.extend(parsed),
                None => return opaque(trimmed),
            }
        }

        Constraint::all_of(trimmed, comparators)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }
}
