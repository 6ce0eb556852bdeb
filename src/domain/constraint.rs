//! Version constraints
//!
//! A [`Constraint`] is a conjunction of [`Comparator`]s. The common case is a
//! single operator paired with a version (`^1.2.0`, `==2.26.0`); compound
//! manifest ranges such as `>=1.0,<2.0` become several comparators in one
//! constraint, and an empty list means "unconstrained".

use super::version::{Confidence, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Constraint operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `==1.2.3` / `=1.2.3` / Maven soft pin
    Exact,
    /// `>=1.2.3`
    GreaterOrEqual,
    /// `<=1.2.3`
    LessOrEqual,
    /// `>1.2.3`
    Greater,
    /// `<1.2.3`
    Less,
    /// `^1.2.3`: same leading non-zero component
    Caret,
    /// `~1.2.3`: same major.minor
    Tilde,
    /// `!=1.2.3`: excludes one version without bounding the range
    NotEqual,
}

impl Operator {
    /// Returns the canonical symbol for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Exact => "==",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::Caret => "^",
            Operator::Tilde => "~",
            Operator::NotEqual => "!=",
        }
    }
}

/// A single operator/version pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparator {
    pub op: Operator,
    pub version: Version,
}

impl Comparator {
    pub fn new(op: Operator, version: Version) -> Self {
        Self { op, version }
    }

    /// Returns true if `candidate` satisfies this comparator
    pub fn matches(&self, candidate: &Version) -> bool {
        let cmp = candidate.compare(&self.version);
        let ord = cmp.ordering;

        match self.op {
            Operator::Exact => match cmp.confidence {
                Confidence::High => ord == Ordering::Equal,
                Confidence::Low => candidate.raw() == self.version.raw(),
            },
            Operator::NotEqual => match cmp.confidence {
                Confidence::High => ord != Ordering::Equal,
                Confidence::Low => candidate.raw() != self.version.raw(),
            },
            Operator::GreaterOrEqual => ord != Ordering::Less,
            Operator::LessOrEqual => ord != Ordering::Greater,
            Operator::Greater => ord == Ordering::Greater,
            Operator::Less => ord == Ordering::Less,
            Operator::Caret => {
                if ord == Ordering::Less {
                    return false;
                }
                match (candidate.semver(), self.version.semver()) {
                    (Some(c), Some(base)) => {
                        if base.major > 0 {
                            c.major == base.major
                        } else if base.minor > 0 {
                            c.major == 0 && c.minor == base.minor
                        } else {
                            c.major == 0 && c.minor == 0 && c.patch == base.patch
                        }
                    }
                    // Degrades to >= under lexicographic order
                    _ => true,
                }
            }
            Operator::Tilde => {
                if ord == Ordering::Less {
                    return false;
                }
                match (candidate.semver(), self.version.semver()) {
                    (Some(c), Some(base)) => c.major == base.major && c.minor == base.minor,
                    _ => true,
                }
            }
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

/// A conjunction of comparators, as declared by one manifest entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// The declaration as it appeared in the manifest
    pub raw: String,
    /// All comparators must hold; empty means unconstrained
    pub comparators: Vec<Comparator>,
}

impl Constraint {
    /// Creates a single-operator constraint
    pub fn new(op: Operator, version: Version) -> Self {
        let comparator = Comparator::new(op, version);
        Self {
            raw: comparator.to_string(),
            comparators: vec![comparator],
        }
    }

    /// Creates a constraint from several comparators
    pub fn all_of(raw: impl Into<String>, comparators: Vec<Comparator>) -> Self {
        Self {
            raw: raw.into(),
            comparators,
        }
    }

    /// Creates an unconstrained ("any version") constraint
    pub fn any() -> Self {
        Self {
            raw: "*".to_string(),
            comparators: Vec::new(),
        }
    }

    /// Creates an exact pin
    pub fn exact(version: Version) -> Self {
        Self::new(Operator::Exact, version)
    }

    /// Overrides the raw text kept for reporting
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Returns true if no comparator restricts the version
    pub fn is_unconstrained(&self) -> bool {
        self.comparators.is_empty()
    }

    /// The operator of a single-comparator constraint
    pub fn operator(&self) -> Option<Operator> {
        match self.comparators.as_slice() {
            [only] => Some(only.op),
            _ => None,
        }
    }

    /// Exact pins declared by this constraint
    pub fn pins(&self) -> impl Iterator<Item = &Version> {
        self.comparators
            .iter()
            .filter(|c| c.op == Operator::Exact)
            .map(|c| &c.version)
    }

    /// Returns true if this constraint declares an exact pin
    pub fn is_pinned(&self) -> bool {
        self.pins().next().is_some()
    }

    /// Every version operand this constraint mentions
    pub fn operands(&self) -> impl Iterator<Item = &Version> {
        self.comparators.iter().map(|c| &c.version)
    }

    /// Versions ruled out by `!=` clauses
    pub fn exclusions(&self) -> impl Iterator<Item = &Version> {
        self.comparators
            .iter()
            .filter(|c| c.op == Operator::NotEqual)
            .map(|c| &c.version)
    }

    /// Returns true if any operand fell back to lexicographic form
    pub fn has_fallback(&self) -> bool {
        self.operands().any(Version::is_fallback)
    }

    /// Returns true if `version` satisfies every comparator
    pub fn satisfies(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }

    /// Conjunction of two constraints
    pub fn intersect(&self, other: &Constraint) -> Constraint {
        let mut comparators = self.comparators.clone();
        comparators.extend(other.comparators.iter().cloned());
        let raw = match (self.is_unconstrained(), other.is_unconstrained()) {
            (true, _) => other.raw.clone(),
            (_, true) => self.raw.clone(),
            _ => format!("{}, {}", self.raw, other.raw),
        };
        Constraint { raw, comparators }
    }
}

/// Returns true if `version` satisfies `constraint`
pub fn satisfies(version: &Version, constraint: &Constraint) -> bool {
    constraint.satisfies(version)
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
