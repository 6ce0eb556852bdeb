//! Conflict detection and version resolution
//!
//! Both steps are pure, synchronous transforms over a [`CanonicalGraph`]:
//! [`detect`] lists conflicts, and [`resolve`] turns the graph plus those
//! conflicts into a [`ResolutionResult`].
//!
//! [`CanonicalGraph`]: crate::domain::CanonicalGraph
//! [`ResolutionResult`]: crate::domain::ResolutionResult

mod detector;
mod interval;
mod resolver;

pub use detector::detect;
pub use interval::{Bound, Interval};
pub use resolver::resolve;
