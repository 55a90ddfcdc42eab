//! CLI commands

pub mod inspect;
pub mod sample;
