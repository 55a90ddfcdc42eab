//! Sampling pipeline and its observers
//!
//! - [`sampling`]: drives budget, sampling, estimation and smoothing over a model
//! - [`observers`]: progress bar observer

pub mod observers;
pub mod sampling;

pub use observers::ProgressObserver;
pub use sampling::{RunSummary, SamplingPipeline, SamplingRun, StateReport, estimate_model};

pub use crate::ports::SamplingObserver;
