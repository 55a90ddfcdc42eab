//! SUL sampling CLI - Statistical approximation of stochastic transition systems
//!
//! This CLI provides:
//! - Sampling: estimate every state's transition probabilities to a given
//!   accuracy and write the approximated model
//! - Inspection: summarise a model and preview the sampling budget

use anyhow::Result;
use clap::{Parser, Subcommand};
use sul_sampling::cli::{commands, config::init_logging};

#[derive(Parser)]
#[command(name = "sul-sample")]
#[command(version, about = "Monte Carlo estimation of transition probabilities", long_about = None)]
struct Cli {
    /// Enable debug logging (per-state sample budgets)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate transition probabilities by sampling
    Sample(commands::sample::SampleArgs),

    /// Summarise a model and preview the sampling budget
    Inspect(commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !init_logging(cli.verbose) {
        eprintln!("warning: a tracing subscriber is already installed; --verbose has no effect");
    }

    match cli.command {
        Commands::Sample(args) => commands::sample::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
    }
}
