//! Export functionality for sampling runs
//!
//! Currently supports a JSON report of the configuration and the sample
//! budget spent on every state.

mod run_report;

pub use run_report::{RunReport, StateEntry, SummaryEntry};
