//! Empirical sampler: draws outcomes from a state's exact distribution.
//!
//! Each worker owns a [`SmallRng`] seeded from `(base_seed, state, worker)`
//! and counts its draws locally. Worker tallies are combined with an
//! associative reduction once all workers are done; no counter is shared
//! while sampling.

use rand::{Rng, SeedableRng, distr::StandardUniform, rngs::SmallRng};
use rayon::prelude::*;

use crate::{
    Error, Result,
    identifiers::StateId,
    model::Transition,
    sampling::{CountTally, SampleBudget},
};

/// Pick a successor index by inverse-CDF lookup.
///
/// Walks `successors` in order, accumulating exact probabilities, and returns
/// the first index whose cumulative sum is `>= r`. If rounding leaves the
/// total below `r`, the last successor is returned.
///
/// `successors` must not be empty.
///
/// # Examples
///
/// ```
/// use sul_sampling::identifiers::StateId;
/// use sul_sampling::model::Transition;
/// use sul_sampling::sampling::draw_outcome;
///
/// let successors = [
///     Transition::new(StateId::new(1), 0.7),
///     Transition::new(StateId::new(2), 0.3),
/// ];
/// assert_eq!(draw_outcome(&successors, 0.5), 0);
/// assert_eq!(draw_outcome(&successors, 0.7), 0);
/// assert_eq!(draw_outcome(&successors, 0.71), 1);
/// ```
#[inline]
pub fn draw_outcome(successors: &[Transition], r: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, transition) in successors.iter().enumerate() {
        cumulative += transition.probability;
        if cumulative >= r {
            return index;
        }
    }
    successors.len().saturating_sub(1)
}

/// Derive the seed of one worker's generator.
///
/// Mixes the run's base seed with the state and worker indices through the
/// SplitMix64 finalizer, so neighbouring `(state, worker)` pairs get
/// unrelated streams.
pub fn derive_worker_seed(base_seed: u64, state: StateId, worker: usize) -> u64 {
    let mut z = base_seed
        .wrapping_add((state.index() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add((worker as u64).wrapping_mul(0xd1b5_4a32_d192_ed03));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Run one worker: `samples` draws from `successors` using `rng`.
///
/// Returns counts indexed by position in `successors`.
pub fn run_worker<R: Rng>(successors: &[Transition], samples: u64, rng: &mut R) -> Vec<u64> {
    let mut counts = vec![0u64; successors.len()];
    for _ in 0..samples {
        let r: f64 = rng.sample(StandardUniform);
        counts[draw_outcome(successors, r)] += 1;
    }
    counts
}

/// Sample `state` with the given budget and return the merged tally.
///
/// Runs `budget.workers` workers on the current rayon pool, each making
/// `budget.per_worker` draws with its own generator.
///
/// # Errors
///
/// Returns [`Error::EmptyTransitions`] if `successors` is empty.
pub fn sample_state(
    state: StateId,
    successors: &[Transition],
    budget: &SampleBudget,
    base_seed: u64,
) -> Result<CountTally> {
    if successors.is_empty() {
        return Err(Error::EmptyTransitions {
            state: state.index(),
        });
    }

    let tally = (0..budget.workers)
        .into_par_iter()
        .map(|worker| {
            let mut rng = SmallRng::seed_from_u64(derive_worker_seed(base_seed, state, worker));
            let counts = run_worker(successors, budget.per_worker, &mut rng);
            CountTally::from_position_counts(successors, &counts)
        })
        .reduce(CountTally::new, CountTally::merge);

    Ok(tally)
}
