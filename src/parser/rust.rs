//! Rust (Cargo) constraint parser
//!
//! Handles version formats:
//! - Caret (default): `1.2.3` or `^1.2.3`
//! - Exact pinned: `=1.2.3`
//! - Tilde: `~1.2.3`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Wildcard: `*`, `1.*`, `1.2.*`
//! - Conjunction: `>=1.0, <2.0`

use super::{comparators_for, opaque, partial, ConstraintParser};
use crate::domain::{Constraint, Ecosystem, Operator};
use regex::Regex;
use std::sync::LazyLock;

/// Rust/Cargo constraint parser
pub struct RustConstraintParser;

static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(=|\^|~|>=|<=|>|<)?\s*([vV]?\d[0-9A-Za-z.*+-]*)$").unwrap()
});

fn operator(symbol: &str) -> Operator {
    match symbol {
        "=" => Operator::Exact,
        "~" => Operator::Tilde,
        ">=" => Operator::GreaterOrEqual,
        "<=" => Operator::LessOrEqual,
        ">" => Operator::Greater,
        "<" => Operator::Less,
        // Bare requirements are caret requirements
        _ => Operator::Caret,
    }
}

impl ConstraintParser for RustConstraintParser {
    fn parse(&self, raw: &str) -> Constraint {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed == "*" {
            return Constraint::any();
        }

        let mut comparators = Vec::new();
        for clause in trimmed.split(',').map(str::trim) {
            let Some(caps) = CLAUSE_RE.captures(clause) else {
                return opaque(trimmed);
            };
            let text = &caps[2];
            let op = operator(caps.get(1).map(|m| m.as_str()).unwrap_or(""));

            if text.contains('*') {
                // 1.* and 1.2.* match like =1 and =1.2
                let (version, precision) = partial(text);
                if version.is_fallback() || !matches!(op, Operator::Caret | Operator::Exact) {
                    return opaque(trimmed);
                }
                comparators.extend(comparators_for(Operator::Exact, version, precision));
                continue;
            }

            let (version, precision) = partial(text);
            comparators.extend(comparators_for(op, version, precision));
        }

        Constraint::all_of(trimmed, comparators)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rust
    }
}
