//! Independent acceptance test for candidate results.
//!
//! The adjudicator knows nothing about which computation produced a
//! candidate and holds no state across calls. It applies three cheap
//! checks: length, monotonicity in the requested direction, and a sum
//! comparison. The sum check is a deliberately weak surrogate for "same
//! multiset of values": two different sequences with equal length, valid
//! order, and equal sums would be accepted. That false-positive window is
//! a known limitation of the acceptance test, kept deliberately cheap
//! rather than silently strengthened to full multiset equality.

use crate::computation::Sequence;

/// Required ordering of an accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// Outcome of adjudicating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjudicationVerdict {
    Accepted,
    Rejected,
}

/// Stateless acceptance test relating a candidate to the original input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjudicator;

impl Adjudicator {
    pub fn new() -> Self {
        Self
    }

    /// Decides whether `candidate` is acceptable as a sorted rendition of
    /// `original`.
    ///
    /// Rejects if the lengths differ, the candidate is not monotonic in
    /// `direction` (an empty candidate counts as not monotonic), or the
    /// wrapping sums of the two sequences differ.
    pub fn accepts(
        &self,
        original: &Sequence,
        candidate: &Sequence,
        direction: OrderDirection,
    ) -> AdjudicationVerdict {
        if candidate.len() != original.len() {
            return AdjudicationVerdict::Rejected;
        }
        if !is_monotonic(candidate, direction) {
            return AdjudicationVerdict::Rejected;
        }
        if wrapping_sum(original) != wrapping_sum(candidate) {
            return AdjudicationVerdict::Rejected;
        }
        AdjudicationVerdict::Accepted
    }
}

/// Length 0 is defined as not monotonic: an empty candidate is never an
/// acceptable result.
fn is_monotonic(values: &Sequence, direction: OrderDirection) -> bool {
    if values.is_empty() {
        return false;
    }
    match direction {
        OrderDirection::Ascending => values.windows(2).all(|w| w[0] <= w[1]),
        OrderDirection::Descending => values.windows(2).all(|w| w[0] >= w[1]),
    }
}

/// Wrapping addition keeps the surrogate total free of overflow panics;
/// wraparound collisions fall within the check's already-accepted
/// false-positive window.
fn wrapping_sum(values: &Sequence) -> i64 {
    values.iter().fold(0i64, |acc, v| acc.wrapping_add(*v))
}
