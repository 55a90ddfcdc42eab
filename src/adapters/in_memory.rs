//! In-memory model store for testing.
//!
//! Serves a fixed input model and keeps whatever result is stored, so the
//! load-sample-store flow can be exercised without touching the file system.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    Result,
    model::{Labels, Model, ResultModel},
    ports::{ModelSource, ResultSink},
};

/// In-memory model source and result sink.
///
/// Clones share the stored result.
///
/// # Examples
///
/// ```
/// use sul_sampling::adapters::InMemoryModelStore;
/// use sul_sampling::identifiers::StateId;
/// use sul_sampling::model::{Labels, Model, TransitionModel};
/// use sul_sampling::ports::ModelSource;
///
/// let mut transitions = TransitionModel::new(1);
/// transitions.push(StateId::new(0), StateId::new(0), 1.0)?;
/// let store = InMemoryModelStore::new(Model::new(transitions, Labels::new()));
///
/// assert_eq!(store.load()?.num_states(), 1);
/// assert!(store.stored().is_none());
/// # Ok::<(), sul_sampling::Error>(())
/// ```
#[derive(Clone)]
pub struct InMemoryModelStore {
    model: Model,
    stored: Arc<Mutex<Option<(Labels, ResultModel)>>>,
}

impl InMemoryModelStore {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            stored: Arc::new(Mutex::new(None)),
        }
    }

    /// The most recently stored labels and result, if any.
    pub fn stored(&self) -> Option<(Labels, ResultModel)> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<(Labels, ResultModel)>> {
        self.stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ModelSource for InMemoryModelStore {
    fn load(&self) -> Result<Model> {
        Ok(self.model.clone())
    }
}

impl ResultSink for InMemoryModelStore {
    fn store(&self, labels: &Labels, result: &ResultModel) -> Result<()> {
        *self.lock() = Some((labels.clone(), result.clone()));
        Ok(())
    }
}
