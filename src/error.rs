//! Error types for the SUL sampling crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the SUL sampling crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("epsilon {value} must lie in the open interval (0, 1)")]
    InvalidEpsilon { value: f64 },

    #[error("delta {value} must lie in the half-open interval (0, 1]")]
    InvalidDelta { value: f64 },

    #[error("worker count must be at least 1, got {workers}")]
    InvalidWorkerCount { workers: usize },

    #[error("state {state} has no outgoing transitions")]
    EmptyTransitions { state: usize },

    #[error("state {state} is out of range (model has {num_states} states)")]
    StateOutOfRange { state: usize, num_states: usize },

    #[error("transition {source_state} -> {target} has invalid probability {value}")]
    InvalidProbability {
        source_state: usize,
        target: usize,
        value: f64,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("expected {expected} transitions but found {found}")]
    TransitionCountMismatch { expected: usize, found: usize },

    #[error("result slot for state {state} was already written")]
    ResultSlotAlreadyWritten { state: usize },

    #[error("failed to build worker pool: {message}")]
    ThreadPool { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Build an [`Error::Io`] describing the operation that failed.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
