//! Conversion of merged counts into empirical probabilities.

use crate::{model::Transition, sampling::CountTally};

/// Turn `tally` into a successor list ordered like `successors`.
///
/// Each probability is `tally[target] / total_samples`. The result is not
/// normalised: the sum may differ slightly from 1 and is fixed later by
/// [`smooth`](crate::sampling::smooth).
///
/// # Examples
///
/// ```
/// use sul_sampling::identifiers::StateId;
/// use sul_sampling::model::Transition;
/// use sul_sampling::sampling::{CountTally, estimate};
///
/// let successors = [
///     Transition::new(StateId::new(2), 0.5),
///     Transition::new(StateId::new(1), 0.5),
/// ];
/// let mut tally = CountTally::new();
/// tally.add(StateId::new(1), 30);
/// tally.add(StateId::new(2), 70);
///
/// let estimated = estimate(&tally, 100, &successors);
/// assert_eq!(estimated[0], Transition::new(StateId::new(2), 0.7));
/// assert_eq!(estimated[1], Transition::new(StateId::new(1), 0.3));
/// ```
pub fn estimate(tally: &CountTally, total_samples: u64, successors: &[Transition]) -> Vec<Transition> {
    successors
        .iter()
        .map(|transition| {
            let probability = if total_samples == 0 {
                0.0
            } else {
                tally.count(transition.target) as f64 / total_samples as f64
            };
            Transition::new(transition.target, probability)
        })
        .collect()
}
