//! Accuracy parameters and sampling configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of parallel workers per sampled state.
pub const DEFAULT_WORKERS: usize = 12;

/// Default lower bound on the number of draws each worker makes.
pub const DEFAULT_MIN_SAMPLES_PER_WORKER: u64 = 1;

/// Accuracy guarantee requested from the estimator.
///
/// Each estimated probability lies within `epsilon` of the exact one with
/// probability at least `1 - delta`.
///
/// # Examples
///
/// ```
/// use sul_sampling::sampling::AccuracyParameters;
///
/// let accuracy = AccuracyParameters::new(0.01, 0.05).unwrap();
/// assert_eq!(accuracy.epsilon(), 0.01);
///
/// assert!(AccuracyParameters::new(1.0, 0.05).is_err());
/// assert!(AccuracyParameters::new(0.01, 0.0).is_err());
/// assert!(AccuracyParameters::new(0.01, 1.0).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAccuracyParameters")]
pub struct AccuracyParameters {
    epsilon: f64,
    delta: f64,
}

impl AccuracyParameters {
    /// Create validated accuracy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEpsilon`] unless `0 < epsilon < 1`, and
    /// [`Error::InvalidDelta`] unless `0 < delta <= 1`.
    pub fn new(epsilon: f64, delta: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0 && epsilon < 1.0) {
            return Err(Error::InvalidEpsilon { value: epsilon });
        }
        if !(delta.is_finite() && delta > 0.0 && delta <= 1.0) {
            return Err(Error::InvalidDelta { value: delta });
        }
        Ok(Self { epsilon, delta })
    }

    /// Maximum tolerated absolute error per estimated probability.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Maximum tolerated probability that the error bound is violated.
    pub fn delta(&self) -> f64 {
        self.delta
    }
}

/// Configuration for a sampling run.
///
/// Passed by value into every sampling call; nothing here is global, so runs
/// with different parameters can coexist in one process.
///
/// # Examples
///
/// ```
/// use sul_sampling::sampling::{AccuracyParameters, SamplingConfig};
///
/// let accuracy = AccuracyParameters::new(0.05, 0.01)?;
/// let config = SamplingConfig::new(accuracy)
///     .with_workers(4)?
///     .with_seed(42);
/// assert_eq!(config.workers(), 4);
/// assert_eq!(config.seed(), Some(42));
/// # Ok::<(), sul_sampling::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSamplingConfig")]
pub struct SamplingConfig {
    accuracy: AccuracyParameters,
    workers: usize,
    seed: Option<u64>,
    min_samples_per_worker: u64,
}

impl SamplingConfig {
    /// Create a configuration with default worker count and no fixed seed.
    pub fn new(accuracy: AccuracyParameters) -> Self {
        Self {
            accuracy,
            workers: DEFAULT_WORKERS,
            seed: None,
            min_samples_per_worker: DEFAULT_MIN_SAMPLES_PER_WORKER,
        }
    }

    /// Set the number of parallel workers per state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerCount`] if `workers` is zero.
    pub fn with_workers(mut self, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidWorkerCount { workers });
        }
        self.workers = workers;
        Ok(self)
    }

    /// Fix the base seed so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the lower bound on draws per worker (values below 1 are raised to 1).
    pub fn with_min_samples_per_worker(mut self, min_samples: u64) -> Self {
        self.min_samples_per_worker = min_samples.max(1);
        self
    }

    pub fn accuracy(&self) -> AccuracyParameters {
        self.accuracy
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn min_samples_per_worker(&self) -> u64 {
        self.min_samples_per_worker
    }
}

/// Unchecked accuracy parameters as read from a serialized config
#[derive(Deserialize)]
struct RawAccuracyParameters {
    epsilon: f64,
    delta: f64,
}

impl TryFrom<RawAccuracyParameters> for AccuracyParameters {
    type Error = Error;

    fn try_from(raw: RawAccuracyParameters) -> Result<Self> {
        Self::new(raw.epsilon, raw.delta)
    }
}

/// Unchecked sampling configuration as read from a serialized config
#[derive(Deserialize)]
struct RawSamplingConfig {
    accuracy: AccuracyParameters,
    workers: usize,
    seed: Option<u64>,
    min_samples_per_worker: u64,
}

impl TryFrom<RawSamplingConfig> for SamplingConfig {
    type Error = Error;

    fn try_from(raw: RawSamplingConfig) -> Result<Self> {
        let mut config = Self::new(raw.accuracy)
            .with_workers(raw.workers)?
            .with_min_samples_per_worker(raw.min_samples_per_worker);
        config.seed = raw.seed;
        Ok(config)
    }
}
