//! Smoothing: force each state's outgoing probabilities to sum to one.
//!
//! The residual `1 - sum(first n-1)` is written into the last successor in
//! canonical order. All estimation error ends up on that one successor; the
//! others are left as estimated.

use crate::{model::Transition, model::ResultModel};

/// Smooth a single successor list in place.
///
/// Lists with fewer than two entries are left untouched.
///
/// # Examples
///
/// ```
/// use sul_sampling::identifiers::StateId;
/// use sul_sampling::model::Transition;
/// use sul_sampling::sampling::smooth;
///
/// let mut successors = vec![
///     Transition::new(StateId::new(0), 0.25),
///     Transition::new(StateId::new(1), 0.5),
///     Transition::new(StateId::new(2), 0.2),
/// ];
/// smooth(&mut successors);
/// assert_eq!(successors[0].probability, 0.25);
/// assert_eq!(successors[1].probability, 0.5);
/// assert_eq!(successors[2].probability, 0.25);
/// ```
pub fn smooth(successors: &mut [Transition]) {
    let Some((last, rest)) = successors.split_last_mut() else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    let sum: f64 = rest.iter().map(|t| t.probability).sum();
    last.probability = 1.0 - sum;
}

/// Smooth every recorded state of `result`.
pub fn smooth_all(result: &mut ResultModel) {
    for (_, successors) in result.iter_mut() {
        smooth(successors);
    }
}
