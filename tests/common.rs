//! Common test utilities for the sampling test suite.
//!
//! Model fixtures and small statistics helpers shared by the integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng, distr::StandardUniform, rngs::StdRng};
use sul_sampling::{StateId, TransitionModel, model::Transition};

/// Two states; state 0 goes to 0 with `p` and to 1 with `1 - p`, state 1 loops.
pub fn two_outcome_model(p: f64) -> TransitionModel {
    let mut model = TransitionModel::new(2);
    model.push(StateId::new(0), StateId::new(0), p).unwrap();
    model.push(StateId::new(0), StateId::new(1), 1.0 - p).unwrap();
    model.push(StateId::new(1), StateId::new(1), 1.0).unwrap();
    model
}

/// A random model where every state has between 1 and `max_branching`
/// distinct successors with normalized random weights. Every fifth state
/// (starting at 0) has exactly one successor.
pub fn random_model(num_states: usize, max_branching: usize, seed: u64) -> TransitionModel {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = TransitionModel::new(num_states);
    for source in 0..num_states {
        let branching = if source % 5 == 0 {
            1
        } else {
            rng.random_range(1..=max_branching.min(num_states))
        };
        let mut targets: Vec<usize> = (0..num_states).collect();
        for i in 0..branching {
            let j = rng.random_range(i..num_states);
            targets.swap(i, j);
        }

        let weights: Vec<f64> = (0..branching)
            .map(|_| rng.sample::<f64, _>(StandardUniform) + 0.05)
            .collect();
        let total: f64 = weights.iter().sum();
        for (&target, weight) in targets.iter().zip(&weights) {
            model
                .push(StateId::new(source), StateId::new(target), weight / total)
                .unwrap();
        }
    }
    model
}

/// Sum of probabilities of a successor list.
pub fn probability_sum(successors: &[Transition]) -> f64 {
    successors.iter().map(|t| t.probability).sum()
}

/// Targets of a successor list, in order.
pub fn targets(successors: &[Transition]) -> Vec<usize> {
    successors.iter().map(|t| t.target.index()).collect()
}
