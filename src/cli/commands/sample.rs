//! Sample command - Estimate transition probabilities by Monte Carlo sampling

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::{TextModelFiles, TextResultFiles, text_files::write_header},
    cli::{
        config::WorkerArgs,
        output::{create_spinner, format_number, print_kv, print_section},
    },
    export::RunReport,
    model::Labels,
    pipeline::{ProgressObserver, SamplingPipeline},
    ports::{ModelSource, ResultSink},
    sampling::{AccuracyParameters, SamplingConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Estimate a model's transition probabilities by sampling")]
pub struct SampleArgs {
    /// Input label file
    pub labels: PathBuf,

    /// Input transition file
    pub transitions: PathBuf,

    /// Output label file
    pub output_labels: PathBuf,

    /// Output transition file
    pub output_transitions: PathBuf,

    /// Maximum absolute error per estimated probability, in (0, 1)
    pub epsilon: f64,

    /// Probability of exceeding the error bound, in (0, 1]
    pub delta: f64,

    #[command(flatten)]
    pub workers: WorkerArgs,

    /// Base seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Minimum number of draws per worker
    #[arg(long, default_value_t = 1)]
    pub min_samples: u64,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl SampleArgs {
    /// Validate the numeric options into a sampling configuration.
    pub fn sampling_config(&self) -> Result<SamplingConfig> {
        let accuracy = AccuracyParameters::new(self.epsilon, self.delta)
            .context("invalid accuracy parameters")?;
        let mut config = SamplingConfig::new(accuracy)
            .with_workers(self.workers.workers)?
            .with_min_samples_per_worker(self.min_samples);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

pub fn execute(args: SampleArgs) -> Result<()> {
    // Configuration errors are fatal before any file is touched
    let config = args.sampling_config()?;

    let spinner = create_spinner("Loading model")?;
    let model = TextModelFiles::new(&args.labels, &args.transitions)
        .load()
        .with_context(|| {
            format!(
                "failed to load model from {} and {}",
                args.labels.display(),
                args.transitions.display()
            )
        })?;
    spinner.finish_and_clear();

    print_section("input SUL");
    print_header(model.num_states(), model.num_transitions(), &model.labels)?;

    let mut pipeline = SamplingPipeline::new(config.clone());
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let run = pipeline.run(&model.transitions)?;

    print_section("output sampled");
    print_header(
        run.result.num_states(),
        run.result.num_transitions(),
        &model.labels,
    )?;
    print_kv("Sampled states", &format_number(run.summary.sampled_states as u64));
    print_kv(
        "Deterministic states",
        &format_number(run.summary.deterministic_states as u64),
    );
    print_kv("Samples drawn", &format_number(run.summary.total_samples));
    print_kv("Base seed", &run.summary.base_seed.to_string());
    print_kv(
        "Elapsed",
        &format!("{:.2}s", run.summary.elapsed.as_secs_f64()),
    );

    TextResultFiles::new(&args.output_labels, &args.output_transitions)
        .store(&model.labels, &run.result)
        .context("failed to write sampled model")?;
    println!(
        "\n✓ Sampled model written to: {} and {}",
        args.output_labels.display(),
        args.output_transitions.display()
    );

    if let Some(path) = &args.report {
        RunReport::new(&config, &run)
            .save(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}

fn print_header(num_states: usize, num_transitions: usize, labels: &Labels) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_header(&mut out, num_states, num_transitions, labels)?;
    out.flush()?;
    Ok(())
}
