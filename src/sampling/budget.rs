//! Sample-size estimation.
//!
//! The number of draws per state comes from the additive Hoeffding bound with
//! a union bound over the state's successors:
//!
//! ```text
//! per_worker = ceil( ln(2 * branching_factor / delta) / (2 * epsilon^2) / workers )
//! total      = per_worker * workers
//! ```
//!
//! Rounding up per worker makes the total divide evenly across workers.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, identifiers::StateId, sampling::SamplingConfig};

/// Number of draws for one sampled state and how they are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBudget {
    pub per_worker: u64,
    pub workers: usize,
    pub total: u64,
}

impl SampleBudget {
    /// Compute the budget for a state with `branching_factor` successors.
    ///
    /// # Examples
    ///
    /// ```
    /// use sul_sampling::sampling::{AccuracyParameters, SampleBudget, SamplingConfig};
    ///
    /// let accuracy = AccuracyParameters::new(0.1, 0.05)?;
    /// let config = SamplingConfig::new(accuracy).with_workers(1)?;
    /// let budget = SampleBudget::compute(2, &config);
    /// assert_eq!(budget.per_worker, 220);
    /// assert_eq!(budget.total, 220);
    /// # Ok::<(), sul_sampling::Error>(())
    /// ```
    pub fn compute(branching_factor: usize, config: &SamplingConfig) -> Self {
        let accuracy = config.accuracy();
        let workers = config.workers();
        let epsilon = accuracy.epsilon();

        let bound = (2.0 * branching_factor as f64 / accuracy.delta()).ln() / (2.0 * epsilon * epsilon);
        let per_worker = ((bound / workers as f64).ceil() as u64).max(config.min_samples_per_worker());

        Self {
            per_worker,
            workers,
            total: per_worker.saturating_mul(workers as u64),
        }
    }
}

/// Sampling plan for a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateBudget {
    /// Exactly one successor: probability 1.0, nothing to sample.
    Deterministic,
    /// Two or more successors, sampled with the given budget.
    Sampled(SampleBudget),
}

impl StateBudget {
    /// Plan the work for `state` given its number of successors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTransitions`] when `branching_factor` is zero.
    pub fn plan(state: StateId, branching_factor: usize, config: &SamplingConfig) -> Result<Self> {
        match branching_factor {
            0 => Err(Error::EmptyTransitions {
                state: state.index(),
            }),
            1 => Ok(StateBudget::Deterministic),
            n => Ok(StateBudget::Sampled(SampleBudget::compute(n, config))),
        }
    }

    /// Total draws this plan performs.
    pub fn total_samples(&self) -> u64 {
        match self {
            StateBudget::Deterministic => 0,
            StateBudget::Sampled(budget) => budget.total,
        }
    }
}
