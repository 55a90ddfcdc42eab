//! Shared configuration for CLI commands

use clap::Args;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::sampling::DEFAULT_WORKERS;

/// Options shared by commands that sample or plan sampling
#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Number of parallel workers per sampled state
    #[arg(long, short = 'w', default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
}

/// Install the global tracing subscriber, writing to stderr.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
