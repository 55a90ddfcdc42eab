//! CLI infrastructure for the SUL sampling toolkit
//!
//! This module provides the command-line interface for estimating a model's
//! transition probabilities and inspecting models.

pub mod commands;
pub mod config;
pub mod output;
