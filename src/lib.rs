//! Statistical model construction for stochastic labelled transition systems
//!
//! Estimates the outgoing transition probabilities of every state of a system
//! under learning (SUL) by Monte Carlo sampling from its exact distribution.
//! Each estimate lies within `epsilon` of the exact value with probability at
//! least `1 - delta`.
//!
//! This crate provides:
//! - Sample-size estimation from the Hoeffding bound ([`sampling::budget`])
//! - Parallel inverse-CDF sampling with per-worker generators ([`sampling::sampler`])
//! - Count-to-probability estimation and sum-to-one smoothing
//! - A pipeline driving all states of a model, with observers ([`pipeline`])
//! - Text label/transition file adapters and a JSON run report

pub mod adapters;
pub mod cli;
pub mod error;
pub mod export;
pub mod identifiers;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod sampling;

pub use error::{Error, Result};
pub use identifiers::{LabelHash, StateId};
pub use model::{Labels, Model, ResultModel, Transition, TransitionModel};
pub use pipeline::{SamplingPipeline, SamplingRun, estimate_model};
pub use sampling::{AccuracyParameters, SamplingConfig};
