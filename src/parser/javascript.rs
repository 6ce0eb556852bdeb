//! JavaScript (npm/yarn/pnpm) constraint parser
//!
//! Handles version formats:
//! - Exact: `1.2.3`, `=1.2.3`
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2.3`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - X-ranges: `*`, `1`, `1.x`, `1.2.*`
//! - Conjunction: `>=1.0.0 <2.0.0`
//! - Hyphen range: `1.0.0 - 2.0.0`
//!
//! Unions (`||`), dist-tags, and URL/git/workspace specifiers are kept as
//! opaque pins.

use super::{comparators_for, opaque, partial, ConstraintParser};
use crate::domain::{Comparator, Constraint, Ecosystem, Operator};
use regex::Regex;
use std::sync::LazyLock;

/// JavaScript constraint parser
pub struct JavaScriptConstraintParser;

static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());
static OPERATOR_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|~>|[><=^~])\s+").unwrap());
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\^|~>|~|>=|<=|>|<|=)?(.+)$").unwrap());

fn is_wildcard(text: &str) -> bool {
    matches!(text, "*" | "x" | "X")
}

fn operator(symbol: &str) -> Operator {
    match symbol {
        "^" => Operator::Caret,
        "~" | "~>" => Operator::Tilde,
        ">=" => Operator::GreaterOrEqual,
        "<=" => Operator::LessOrEqual,
        ">" => Operator::Greater,
        "<" => Operator::Less,
        _ => Operator::Exact,
    }
}

impl JavaScriptConstraintParser {
    fn hyphen(lower: &str, upper: &str) -> Vec<Comparator> {
        let mut comparators = Vec::new();
        if !is_wildcard(lower) {
            let (version, _) = partial(lower);
            comparators.push(Comparator::new(Operator::GreaterOrEqual, version));
        }
        if !is_wildcard(upper) {
            let (version, precision) = partial(upper);
            comparators.extend(comparators_for(Operator::LessOrEqual, version, precision));
        }
        comparators
    }
}

impl ConstraintParser for JavaScriptConstraintParser {
    fn parse(&self, raw: &str) -> Constraint {
        let trimmed = raw.trim();

        if trimmed.is_empty() || is_wildcard(trimmed) {
            return Constraint::any();
        }

        if trimmed.contains("||") || trimmed.contains(':') || trimmed.contains('/') {
            return opaque(trimmed);
        }

        if let Some(caps) = HYPHEN_RE.captures(trimmed) {
            return Constraint::all_of(trimmed, Self::hyphen(&caps[1], &caps[2]));
        }

        let normalized = OPERATOR_SPACE_RE.replace_all(trimmed, "$1");
        let mut comparators = Vec::new();
        for token in normalized.split_whitespace() {
            let Some(caps) = TOKEN_RE.captures(token) else {
                return opaque(trimmed);
            };
            let text = &caps[2];
            if is_wildcard(text) {
                continue;
            }
            let op = operator(caps.get(1).map(|m| m.as_str()).unwrap_or(""));
            let (version, precision) = partial(text);
            comparators.extend(comparators_for(op, version, precision));
        }

        Constraint::all_of(trimmed, comparators)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::JavaScript
    }
}
