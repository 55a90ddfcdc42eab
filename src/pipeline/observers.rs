//! Observer implementations for sampling runs

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Error, Result,
    pipeline::{RunSummary, StateReport},
    ports::SamplingObserver,
    sampling::StateBudget,
};

/// Progress bar observer - Shows per-state progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    samples: u64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            samples: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingObserver for ProgressObserver {
    fn on_sampling_start(&mut self, num_states: usize) -> Result<()> {
        let pb = ProgressBar::new(num_states as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} states ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_state_sampled(&mut self, report: &StateReport) -> Result<()> {
        if let StateBudget::Sampled(budget) = report.budget {
            self.samples += budget.total;
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(format!("{} samples", self.samples));
        }
        Ok(())
    }

    fn on_sampling_end(&mut self, summary: &RunSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{} samples", summary.total_samples));
        }
        Ok(())
    }
}
