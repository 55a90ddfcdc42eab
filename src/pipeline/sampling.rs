//! Sampling pipeline: drives estimation over every state of a model

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    identifiers::StateId,
    model::{ResultModel, Transition, TransitionModel},
    ports::SamplingObserver,
    sampling::{SamplingConfig, StateBudget, estimate, sample_state, smooth_all},
};

/// What was done for one state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub state: StateId,
    pub num_states: usize,
    pub branching_factor: usize,
    pub budget: StateBudget,
}

/// Totals for a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub num_states: usize,
    pub num_transitions: usize,
    pub sampled_states: usize,
    pub deterministic_states: usize,
    pub total_samples: u64,
    pub base_seed: u64,
    pub elapsed: Duration,
}

/// Output of a sampling run
#[derive(Debug, Clone)]
pub struct SamplingRun {
    /// Estimated and smoothed transitions
    pub result: ResultModel,

    /// One report per state, in state order
    pub reports: Vec<StateReport>,

    /// Run totals
    pub summary: RunSummary,
}

/// Sampling pipeline for a single model
///
/// States are processed one after another; within a state the draws are
/// spread over `config.workers()` parallel workers on a dedicated pool.
pub struct SamplingPipeline {
    config: SamplingConfig,
    observers: Vec<Box<dyn SamplingObserver>>,
}

impl SamplingPipeline {
    /// Create a new sampling pipeline
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn SamplingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Estimate every state of `model` and smooth the result.
    ///
    /// # Errors
    ///
    /// Fails before any sampling if a state has no outgoing transitions, or if
    /// the worker pool cannot be built. Observer errors abort the run.
    pub fn run(&mut self, model: &TransitionModel) -> Result<SamplingRun> {
        model.validate()?;

        let started = Instant::now();
        let num_states = model.num_states();
        let base_seed = self.config.seed().unwrap_or_else(|| rand::rng().random());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers())
            .thread_name(|index| format!("sampler-{index}"))
            .build()
            .map_err(|e| Error::ThreadPool {
                message: e.to_string(),
            })?;

        info!(
            num_states,
            num_transitions = model.num_transitions(),
            epsilon = self.config.accuracy().epsilon(),
            delta = self.config.accuracy().delta(),
            workers = self.config.workers(),
            base_seed,
            "sampling started"
        );
        for observer in &mut self.observers {
            observer.on_sampling_start(num_states)?;
        }

        let mut result = ResultModel::shaped_like(model);
        let mut reports = Vec::with_capacity(num_states);

        for (state, successors) in model.iter() {
            let budget = StateBudget::plan(state, successors.len(), &self.config)?;

            let estimated = match budget {
                StateBudget::Deterministic => vec![Transition::new(successors[0].target, 1.0)],
                StateBudget::Sampled(sample_budget) => {
                    debug!(
                        state = state.index(),
                        num_states,
                        branching_factor = successors.len(),
                        per_worker = sample_budget.per_worker,
                        total = sample_budget.total,
                        "sampling state"
                    );
                    let tally =
                        pool.install(|| sample_state(state, successors, &sample_budget, base_seed))?;
                    estimate(&tally, sample_budget.total, successors)
                }
            };
            result.record(state, estimated)?;

            let report = StateReport {
                state,
                num_states,
                branching_factor: successors.len(),
                budget,
            };
            for observer in &mut self.observers {
                observer.on_state_sampled(&report)?;
            }
            reports.push(report);
        }

        smooth_all(&mut result);

        let sampled_states = reports
            .iter()
            .filter(|r| matches!(r.budget, StateBudget::Sampled(_)))
            .count();
        let summary = RunSummary {
            num_states,
            num_transitions: model.num_transitions(),
            sampled_states,
            deterministic_states: num_states - sampled_states,
            total_samples: reports.iter().map(|r| r.budget.total_samples()).sum(),
            base_seed,
            elapsed: started.elapsed(),
        };

        info!(
            sampled_states = summary.sampled_states,
            deterministic_states = summary.deterministic_states,
            total_samples = summary.total_samples,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "sampling finished"
        );
        for observer in &mut self.observers {
            observer.on_sampling_end(&summary)?;
        }

        Ok(SamplingRun {
            result,
            reports,
            summary,
        })
    }
}

/// Estimate `model` with `config` and no observers.
///
/// # Examples
///
/// ```
/// use sul_sampling::identifiers::StateId;
/// use sul_sampling::model::TransitionModel;
/// use sul_sampling::pipeline::estimate_model;
/// use sul_sampling::sampling::{AccuracyParameters, SamplingConfig};
///
/// let mut model = TransitionModel::new(2);
/// model.push(StateId::new(0), StateId::new(0), 0.4)?;
/// model.push(StateId::new(0), StateId::new(1), 0.6)?;
/// model.push(StateId::new(1), StateId::new(1), 1.0)?;
///
/// let config = SamplingConfig::new(AccuracyParameters::new(0.05, 0.05)?).with_seed(1);
/// let result = estimate_model(&model, config)?;
///
/// let sum: f64 = result.successors(StateId::new(0)).unwrap().iter().map(|t| t.probability).sum();
/// assert!((sum - 1.0).abs() < 1e-9);
/// assert_eq!(result.successors(StateId::new(1)).unwrap()[0].probability, 1.0);
/// # Ok::<(), sul_sampling::Error>(())
/// ```
pub fn estimate_model(model: &TransitionModel, config: SamplingConfig) -> Result<ResultModel> {
    SamplingPipeline::new(config).run(model).map(|run| run.result)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::sampling::AccuracyParameters;

    fn s(index: usize) -> StateId {
        StateId::new(index)
    }

    fn config() -> SamplingConfig {
        SamplingConfig::new(AccuracyParameters::new(0.05, 0.05).unwrap())
            .with_workers(3)
            .unwrap()
            .with_seed(17)
    }

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl SamplingObserver for Recorder {
        fn on_sampling_start(&mut self, num_states: usize) -> Result<()> {
            self.events.lock().unwrap().push(format!("start {num_states}"));
            Ok(())
        }

        fn on_state_sampled(&mut self, report: &StateReport) -> Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("state {}", report.state));
            Ok(())
        }

        fn on_sampling_end(&mut self, _summary: &RunSummary) -> Result<()> {
            self.events.lock().unwrap().push("end".to_string());
            Ok(())
        }
    }

    #[test]
    fn observers_see_every_state_in_order() {
        let mut model = TransitionModel::new(2);
        model.push(s(0), s(1), 0.5).unwrap();
        model.push(s(0), s(0), 0.5).unwrap();
        model.push(s(1), s(1), 1.0).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            events: Arc::clone(&events),
        };
        let mut pipeline = SamplingPipeline::new(config()).with_observer(Box::new(recorder));
        pipeline.run(&model).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["start 2", "state 0", "state 1", "end"]
        );
    }

    #[test]
    fn empty_state_aborts_before_sampling() {
        let mut model = TransitionModel::new(3);
        model.push(s(0), s(1), 1.0).unwrap();
        model.push(s(1), s(0), 1.0).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            events: Arc::clone(&events),
        };
        let err = SamplingPipeline::new(config())
            .with_observer(Box::new(recorder))
            .run(&model)
            .unwrap_err();

        assert!(matches!(err, Error::EmptyTransitions { state: 2 }));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn summary_counts_samples() {
        let mut model = TransitionModel::new(3);
        model.push(s(0), s(1), 0.5).unwrap();
        model.push(s(0), s(2), 0.5).unwrap();
        model.push(s(1), s(2), 1.0).unwrap();
        model.push(s(2), s(0), 0.25).unwrap();
        model.push(s(2), s(1), 0.75).unwrap();

        let run = SamplingPipeline::new(config()).run(&model).unwrap();
        let expected: u64 = run.reports.iter().map(|r| r.budget.total_samples()).sum();

        assert_eq!(run.summary.sampled_states, 2);
        assert_eq!(run.summary.deterministic_states, 1);
        assert_eq!(run.summary.total_samples, expected);
        assert_eq!(run.summary.base_seed, 17);
        assert!(run.result.is_complete());
    }
}
