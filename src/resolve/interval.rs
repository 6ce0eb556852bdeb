//! Version intervals for range intersection
//!
//! Every semantic comparator maps to a contiguous interval; a conjunction
//! of comparators is satisfiable only if the intersection of their
//! intervals is non-empty.

use crate::domain::{Comparator, Operator, Version};
use std::cmp::Ordering;

/// One end of an interval
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl Bound {
    fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

/// A contiguous version range; a missing bound is unbounded on that side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interval {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Interval {
    /// The interval containing every version
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Interval a single comparator admits
    ///
    /// Caret and tilde upper bounds are the `X.Y.Z-0` floor of the next
    /// line, so pre-releases of the next line stay outside. An exclusion
    /// punches a hole rather than moving a bound, so it is unbounded here.
    pub fn from_comparator(comparator: &Comparator) -> Self {
        let v = comparator.version.clone();
        match comparator.op {
            Operator::Exact => Self {
                lower: Some(Bound::inclusive(v.clone())),
                upper: Some(Bound::inclusive(v)),
            },
            Operator::GreaterOrEqual => Self {
                lower: Some(Bound::inclusive(v)),
                upper: None,
            },
            Operator::Greater => Self {
                lower: Some(Bound::exclusive(v)),
                upper: None,
            },
            Operator::LessOrEqual => Self {
                lower: None,
                upper: Some(Bound::inclusive(v)),
            },
            Operator::Less => Self {
                lower: None,
                upper: Some(Bound::exclusive(v)),
            },
            Operator::Caret => {
                let upper = match (v.major(), v.minor()) {
                    (Some(0), Some(0)) => v.next_patch_floor(),
                    (Some(0), _) => v.next_minor_floor(),
                    _ => v.next_major_floor(),
                };
                Self {
                    upper: upper.map(Bound::exclusive),
                    lower: Some(Bound::inclusive(v)),
                }
            }
            Operator::Tilde => Self {
                upper: v.next_minor_floor().map(Bound::exclusive),
                lower: Some(Bound::inclusive(v)),
            },
            Operator::NotEqual => Self::unbounded(),
        }
    }

    /// Intersection of every comparator's interval
    pub fn from_comparators<'a>(comparators: impl IntoIterator<Item = &'a Comparator>) -> Self {
        comparators
            .into_iter()
            .fold(Self::unbounded(), |acc, c| acc.intersect(&Self::from_comparator(c)))
    }

    /// The tighter of both bounds on each side
    pub fn intersect(&self, other: &Interval) -> Interval {
        let lower = match (&self.lower, &other.lower) {
            (Some(a), Some(b)) => Some(tighter(a, b, Ordering::Greater)),
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        let upper = match (&self.upper, &other.upper) {
            (Some(a), Some(b)) => Some(tighter(a, b, Ordering::Less)),
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        Interval { lower, upper }
    }

    /// The only version inside the interval, when both bounds meet
    pub fn single_point(&self) -> Option<&Version> {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper))
                if lower.inclusive
                    && upper.inclusive
                    && lower.version.cmp_version(&upper.version) == Ordering::Equal =>
            {
                Some(&lower.version)
            }
            _ => None,
        }
    }

    /// Returns true if no version can lie inside the interval
    pub fn is_empty(&self) -> bool {
        let (Some(lower), Some(upper)) = (&self.lower, &self.upper) else {
            return false;
        };
        match lower.version.cmp_version(&upper.version) {
            Ordering::Greater => true,
            Ordering::Equal => !(lower.inclusive && upper.inclusive),
            Ordering::Less => false,
        }
    }
}

/// Pick the bound further in direction `toward`; on a tie the exclusive
/// bound is the tighter one
fn tighter(a: &Bound, b: &Bound, toward: Ordering) -> Bound {
    match a.version.cmp_version(&b.version) {
        Ordering::Equal => {
            if a.inclusive {
                b.clone()
            } else {
                a.clone()
            }
        }
        ord if ord == toward => a.clone(),
        _ => b.clone(),
    }
}
