//! Adapters implementing domain ports.
//!
//! Following hexagonal architecture, adapters depend on domain ports, not the
//! other way around.

pub mod in_memory;
pub mod text_files;

pub use in_memory::InMemoryModelStore;
pub use text_files::{TextModelFiles, TextResultFiles};
