//! Per-successor outcome counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{identifiers::StateId, model::Transition};

/// Observed sample counts per successor for one sampling pass over a state.
///
/// Worker-local tallies are combined with [`CountTally::merge`], an
/// element-wise sum. The merge is associative and commutative, so the combined
/// tally does not depend on the order in which workers finish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTally(BTreeMap<StateId, u64>);

impl CountTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tally from counts indexed by position in `successors`.
    ///
    /// A successor listed more than once accumulates the counts of all its
    /// positions.
    pub fn from_position_counts(successors: &[Transition], counts: &[u64]) -> Self {
        let mut tally = Self::new();
        for (transition, &count) in successors.iter().zip(counts) {
            tally.add(transition.target, count);
        }
        tally
    }

    /// Add `count` observations of `target`.
    pub fn add(&mut self, target: StateId, count: u64) {
        *self.0.entry(target).or_insert(0) += count;
    }

    /// Record a single observation of `target`.
    pub fn increment(&mut self, target: StateId) {
        self.add(target, 1);
    }

    /// Observations of `target` (zero if never seen).
    pub fn count(&self, target: StateId) -> u64 {
        self.0.get(&target).copied().unwrap_or(0)
    }

    /// Total observations over all successors.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Element-wise sum of two tallies.
    ///
    /// # Examples
    ///
    /// ```
    /// use sul_sampling::identifiers::StateId;
    /// use sul_sampling::sampling::CountTally;
    ///
    /// let mut a = CountTally::new();
    /// a.add(StateId::new(1), 3);
    /// let mut b = CountTally::new();
    /// b.add(StateId::new(1), 2);
    /// b.add(StateId::new(2), 5);
    ///
    /// let merged = a.merge(b);
    /// assert_eq!(merged.count(StateId::new(1)), 5);
    /// assert_eq!(merged.count(StateId::new(2)), 5);
    /// assert_eq!(merged.total(), 10);
    /// ```
    pub fn merge(mut self, other: CountTally) -> CountTally {
        if self.0.len() < other.0.len() {
            return other.merge(self);
        }
        for (target, count) in other.0 {
            self.add(target, count);
        }
        self
    }

    /// Iterate over `(successor, count)` pairs in ascending successor order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, u64)> + '_ {
        self.0.iter().map(|(&target, &count)| (target, count))
    }
}
