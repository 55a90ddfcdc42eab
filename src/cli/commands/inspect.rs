//! Inspect command - Summarise a model and preview the sampling budget

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::{TextModelFiles, text_files::write_model_dump},
    cli::{
        config::WorkerArgs,
        output::{format_number, print_kv, print_section},
    },
    model::Model,
    ports::ModelSource,
    sampling::{AccuracyParameters, SamplingConfig, StateBudget},
};

#[derive(Parser, Debug)]
#[command(about = "Summarise a model and preview the sampling budget")]
pub struct InspectArgs {
    /// Input label file
    pub labels: PathBuf,

    /// Input transition file
    pub transitions: PathBuf,

    /// Print every transition, not only the summary
    #[arg(long)]
    pub full: bool,

    /// Epsilon for the budget preview (requires --delta)
    #[arg(long, requires = "delta")]
    pub epsilon: Option<f64>,

    /// Delta for the budget preview (requires --epsilon)
    #[arg(long, requires = "epsilon")]
    pub delta: Option<f64>,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Shape statistics of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelShape {
    pub num_states: usize,
    pub num_transitions: usize,
    pub labelled_states: usize,
    pub deterministic_states: usize,
    pub max_branching_factor: usize,
}

impl ModelShape {
    pub fn of(model: &Model) -> Self {
        let branching = || model.transitions.iter().map(|(_, successors)| successors.len());
        Self {
            num_states: model.num_states(),
            num_transitions: model.num_transitions(),
            labelled_states: model.labels.len(),
            deterministic_states: branching().filter(|&n| n == 1).count(),
            max_branching_factor: branching().max().unwrap_or(0),
        }
    }
}

/// Total draws a `sample` run with `config` would perform on `model`.
pub fn planned_samples(model: &Model, config: &SamplingConfig) -> crate::Result<u64> {
    model
        .transitions
        .iter()
        .map(|(state, successors)| {
            StateBudget::plan(state, successors.len(), config).map(|plan| plan.total_samples())
        })
        .sum()
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let model = TextModelFiles::new(&args.labels, &args.transitions)
        .load()
        .with_context(|| {
            format!(
                "failed to load model from {} and {}",
                args.labels.display(),
                args.transitions.display()
            )
        })?;

    if args.full {
        print_section("input SUL");
        let mut out = std::io::stdout().lock();
        write_model_dump(&mut out, &model)?;
        out.flush()?;
    }

    let shape = ModelShape::of(&model);
    print_section("model summary");
    print_kv("States", &format_number(shape.num_states as u64));
    print_kv("Transitions", &format_number(shape.num_transitions as u64));
    print_kv("Labelled states", &format_number(shape.labelled_states as u64));
    print_kv(
        "Deterministic states",
        &format_number(shape.deterministic_states as u64),
    );
    print_kv("Max branching factor", &shape.max_branching_factor.to_string());

    if let (Some(epsilon), Some(delta)) = (args.epsilon, args.delta) {
        let accuracy =
            AccuracyParameters::new(epsilon, delta).context("invalid accuracy parameters")?;
        let config = SamplingConfig::new(accuracy).with_workers(args.workers.workers)?;
        model.transitions.validate()?;
        let total = planned_samples(&model, &config)?;

        print_section("sampling budget");
        print_kv("Epsilon", &epsilon.to_string());
        print_kv("Delta", &delta.to_string());
        print_kv("Workers", &config.workers().to_string());
        print_kv("Planned samples", &format_number(total));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        identifiers::StateId,
        model::{Labels, TransitionModel},
        sampling::SampleBudget,
    };

    fn model() -> Model {
        let mut transitions = TransitionModel::new(3);
        transitions.push(StateId::new(0), StateId::new(1), 0.5).unwrap();
        transitions.push(StateId::new(0), StateId::new(2), 0.5).unwrap();
        transitions.push(StateId::new(1), StateId::new(1), 1.0).unwrap();
        transitions.push(StateId::new(2), StateId::new(0), 0.1).unwrap();
        transitions.push(StateId::new(2), StateId::new(1), 0.2).unwrap();
        transitions.push(StateId::new(2), StateId::new(2), 0.7).unwrap();
        Model::new(transitions, Labels::new())
    }

    #[test]
    fn shape_counts_branching() {
        let shape = ModelShape::of(&model());
        assert_eq!(shape.num_states, 3);
        assert_eq!(shape.num_transitions, 6);
        assert_eq!(shape.deterministic_states, 1);
        assert_eq!(shape.max_branching_factor, 3);
    }

    #[test]
    fn planned_samples_sums_state_budgets() {
        let config = SamplingConfig::new(AccuracyParameters::new(0.1, 0.1).unwrap())
            .with_workers(2)
            .unwrap();
        let expected =
            SampleBudget::compute(2, &config).total + SampleBudget::compute(3, &config).total;
        assert_eq!(planned_samples(&model(), &config).unwrap(), expected);
    }

    #[test]
    fn execute_previews_budget() {
        let dir = tempfile::TempDir::new().unwrap();
        let labels = dir.path().join("in.lab");
        let transitions = dir.path().join("in.tra");
        std::fs::write(&labels, "#DECLARATION\n0: init\n").unwrap();
        std::fs::write(&transitions, "2 3\n0 0 0.5\n0 1 0.5\n1 1 1.0\n").unwrap();

        let args = InspectArgs {
            labels,
            transitions,
            full: true,
            epsilon: Some(0.1),
            delta: Some(0.1),
            workers: WorkerArgs { workers: 2 },
        };
        execute(args).unwrap();
    }
}
