//! Java (Maven/Gradle) constraint parser
//!
//! Handles:
//! - Soft requirements: `1.2.3`, `5.0.0.RELEASE` (treated as pins)
//! - Hard requirements: `[1.2.3]`
//! - Maven ranges: `[1.0,2.0]`, `[1.0,)`, `(,2.0]`, `[1.0,2.0)`
//! - Gradle prefix versions: `1.2.+`, `+`
//! - Gradle strict versions: `1.2.3!!`
//!
//! Range unions (`[1.0,2.0),[3.0,)`), unresolved `${property}` references
//! and dynamic selectors (`latest.release`) stay opaque.

use super::{opaque, partial, span, ConstraintParser};
use crate::domain::{Comparator, Constraint, Ecosystem, Operator, Version};
use regex::Regex;
use std::sync::LazyLock;

/// Java constraint parser
pub struct JavaConstraintParser;

// [lower,upper] with either bound optionally empty, or [exact]
static MAVEN_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\[\(])\s*([^,\[\]\(\)]*?)\s*(?:(,)\s*([^,\[\]\(\)]*?)\s*)?([\]\)])$").unwrap()
});

// Prefix version: 1.2.+ or 1.+
static PREFIX_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\.\+$").unwrap());

impl JavaConstraintParser {
    fn range(caps: &regex::Captures<'_>) -> Option<Vec<Comparator>> {
        let lower = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let upper = caps.get(4).map(|m| m.as_str()).unwrap_or("");
        let inclusive_lower = &caps[1] == "[";
        let inclusive_upper = &caps[5] == "]";

        // [1.0] is a hard pin
        if caps.get(3).is_none() {
            if lower.is_empty() || !inclusive_lower || !inclusive_upper {
                return None;
            }
            return Some(vec![Comparator::new(Operator::Exact, Version::parse(lower))]);
        }

        let mut comparators = Vec::new();
        if !lower.is_empty() {
            let op = if inclusive_lower {
                Operator::GreaterOrEqual
            } else {
                Operator::Greater
            };
            comparators.push(Comparator::new(op, Version::parse(lower)));
        }
        if !upper.is_empty() {
            let op = if inclusive_upper {
                Operator::LessOrEqual
            } else {
                Operator::Less
            };
            comparators.push(Comparator::new(op, Version::parse(upper)));
        }
        Some(comparators)
    }
}

impl ConstraintParser for JavaConstraintParser {
    fn parse(&self, raw: &str) -> Constraint {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed == "+" {
            return Constraint::any();
        }

        if trimmed.contains("${") {
            return opaque(trimmed);
        }

        if trimmed.starts_with(['[', '(']) {
            return match MAVEN_RANGE_RE
                .captures(trimmed)
                .and_then(|caps| Self::range(&caps))
            {
                Some(comparators) => Constraint::all_of(trimmed, comparators),
                None => opaque(trimmed),
            };
        }

        if let Some(caps) = PREFIX_VERSION_RE.captures(trimmed) {
            // 1.2.+ reads as 1.2.x
            let (version, precision) = partial(&caps[1]);
            return Constraint::all_of(trimmed, span(version, precision));
        }

        let pinned = trimmed.strip_suffix("!!").unwrap_or(trimmed);
        Constraint::exact(Version::parse(pinned)).with_raw(trimmed)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Java
    }
}
