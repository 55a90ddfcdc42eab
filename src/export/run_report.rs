use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::{SamplingRun, StateReport},
    sampling::{SamplingConfig, StateBudget},
};

/// JSON report of a sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub config: SamplingConfig,
    pub summary: SummaryEntry,
    pub states: Vec<StateEntry>,
}

/// Run totals as written to the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub num_states: usize,
    pub num_transitions: usize,
    pub sampled_states: usize,
    pub deterministic_states: usize,
    pub total_samples: u64,
    pub base_seed: u64,
    pub elapsed_seconds: f64,
}

/// Budget of a single state as written to the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub state: usize,
    pub branching_factor: usize,
    pub deterministic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_worker_samples: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_samples: Option<u64>,
}

impl From<&StateReport> for StateEntry {
    fn from(report: &StateReport) -> Self {
        let (deterministic, per_worker_samples, total_samples) = match report.budget {
            StateBudget::Deterministic => (true, None, None),
            StateBudget::Sampled(budget) => (false, Some(budget.per_worker), Some(budget.total)),
        };
        Self {
            state: report.state.index(),
            branching_factor: report.branching_factor,
            deterministic,
            per_worker_samples,
            total_samples,
        }
    }
}

impl RunReport {
    /// Build a report from a finished run and the configuration it used
    pub fn new(config: &SamplingConfig, run: &SamplingRun) -> Self {
        let summary = &run.summary;
        Self {
            config: config.clone(),
            summary: SummaryEntry {
                num_states: summary.num_states,
                num_transitions: summary.num_transitions,
                sampled_states: summary.sampled_states,
                deterministic_states: summary.deterministic_states,
                total_samples: summary.total_samples,
                base_seed: summary.base_seed,
                elapsed_seconds: summary.elapsed.as_secs_f64(),
            },
            states: run.reports.iter().map(StateEntry::from).collect(),
        }
    }

    /// Save report to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|source| Error::io(format!("create {}", path.display()), source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .flush()
            .map_err(|source| Error::io(format!("write {}", path.display()), source))?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| Error::io(format!("open {}", path.display()), source))?;
        let report = serde_json::from_reader(BufReader::new(file))?;
        Ok(report)
    }
}
