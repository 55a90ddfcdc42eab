//! Model I/O ports.
//!
//! The sampling core only sees in-memory models. These traits are the
//! boundary to wherever the input model comes from and where the estimated
//! model goes.

use crate::{
    Result,
    model::{Labels, Model, ResultModel},
};

/// Source of an input model.
pub trait ModelSource {
    /// Load the labels and exact transitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be read or is malformed.
    fn load(&self) -> Result<Model>;
}

/// Destination for an estimated model.
pub trait ResultSink {
    /// Store the estimated transitions together with the unchanged labels.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn store(&self, labels: &Labels, result: &ResultModel) -> Result<()>;
}
