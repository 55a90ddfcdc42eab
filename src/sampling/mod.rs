//! Per-state Monte Carlo estimation of transition probabilities.
//!
//! - [`config`]: accuracy parameters and run configuration
//! - [`budget`]: number of draws per state
//! - [`sampler`]: parallel inverse-CDF sampling into a [`CountTally`]
//! - [`tally`]: per-successor counts and their merge
//! - [`estimate`](mod@estimate): counts to probabilities
//! - [`smooth`](mod@smooth): sum-to-one correction

pub mod budget;
pub mod config;
pub mod estimate;
pub mod sampler;
pub mod smooth;
pub mod tally;

pub use budget::{SampleBudget, StateBudget};
pub use config::{AccuracyParameters, DEFAULT_WORKERS, SamplingConfig};
pub use estimate::estimate;
pub use sampler::{derive_worker_seed, draw_outcome, run_worker, sample_state};
pub use smooth::{smooth, smooth_all};
pub use tally::CountTally;
