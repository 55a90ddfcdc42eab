//! Observer port - abstraction for watching a sampling run
//!
//! This port defines the interface for observing sampling events, allowing
//! progress display, logging and report collection without coupling the
//! sampling pipeline to any output format.

use crate::{
    Result,
    pipeline::{RunSummary, StateReport},
};

/// Observer trait for monitoring a sampling run
///
/// # Event Sequence
///
/// 1. `on_sampling_start(num_states)` - once, after the model is validated
/// 2. `on_state_sampled(report)` - once per state, in ascending state order
/// 3. `on_sampling_end(summary)` - once, after smoothing
///
/// # Examples
///
/// ```no_run
/// use sul_sampling::{pipeline::StateReport, ports::SamplingObserver};
///
/// struct CountingObserver {
///     states: usize,
/// }
///
/// impl SamplingObserver for CountingObserver {
///     fn on_state_sampled(&mut self, _report: &StateReport) -> sul_sampling::Result<()> {
///         self.states += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait SamplingObserver: Send {
    /// Called before the first state is sampled.
    fn on_sampling_start(&mut self, _num_states: usize) -> Result<()> {
        Ok(())
    }

    /// Called after a state's estimate has been recorded.
    fn on_state_sampled(&mut self, _report: &StateReport) -> Result<()> {
        Ok(())
    }

    /// Called once every state is recorded and smoothed.
    fn on_sampling_end(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}
