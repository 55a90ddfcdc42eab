mod common;

use std::{fs, io::Cursor, path::Path};

use common::probability_sum;
use sul_sampling::{
    AccuracyParameters, Error, LabelHash, SamplingConfig, SamplingPipeline, StateId,
    ResultModel, TransitionModel,
    adapters::{
        InMemoryModelStore, TextModelFiles, TextResultFiles,
        text_files::{parse_transitions, write_transitions},
    },
    export::RunReport,
    ports::{ModelSource, ResultSink},
    sampling::{CountTally, estimate, smooth},
};
use tempfile::TempDir;

const LABELS: &str = "#DECLARATION\n0: init\n1: left\n2: right\n3: done\n";
const TRANSITIONS: &str = "4 7\n0 1 0.5\n0 2 0.3\n0 3 0.2\n1 3 1.0\n2 0 0.4\n2 3 0.6\n3 3 1.0\n";

fn write_input(dir: &TempDir) -> TextModelFiles {
    let labels = dir.path().join("model.lab");
    let transitions = dir.path().join("model.tra");
    fs::write(&labels, LABELS).unwrap();
    fs::write(&transitions, TRANSITIONS).unwrap();
    TextModelFiles::new(labels, transitions)
}

fn config() -> SamplingConfig {
    SamplingConfig::new(AccuracyParameters::new(0.05, 0.05).unwrap())
        .with_workers(4)
        .unwrap()
        .with_seed(2024)
}

#[test]
fn load_sample_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let model = write_input(&dir).load().unwrap();
    assert_eq!(model.num_states(), 4);
    assert_eq!(model.num_transitions(), 7);
    assert_eq!(model.labels.get(StateId::new(0)), Some(LabelHash::of("init")));

    let run = SamplingPipeline::new(config()).run(&model.transitions).unwrap();

    let out_labels = dir.path().join("out.lab");
    let out_transitions = dir.path().join("out.tra");
    TextResultFiles::new(&out_labels, &out_transitions)
        .store(&model.labels, &run.result)
        .unwrap();

    let written = fs::read_to_string(&out_transitions).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("4 7"));
    let edges: Vec<(usize, usize)> = lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.split_whitespace();
            let source = parts.next().unwrap().parse().unwrap();
            let target = parts.next().unwrap().parse().unwrap();
            (source, target)
        })
        .collect();
    assert_eq!(
        edges,
        vec![(0, 1), (0, 2), (0, 3), (1, 3), (2, 0), (2, 3), (3, 3)]
    );
    assert!(written.ends_with("\n\n"));

    let label_dump = fs::read_to_string(&out_labels).unwrap();
    let first = label_dump.lines().next().unwrap();
    assert!(first.starts_with('[') && first.ends_with(']'));
    assert!(label_dump.contains(&format!("0: {}", LabelHash::of("init"))));

    // The output parses as a transition file again and still sums to one
    let reloaded = TextModelFiles::new(dir.path().join("model.lab"), &out_transitions)
        .load()
        .unwrap();
    for (state, successors) in reloaded.transitions.iter() {
        let sum = probability_sum(successors);
        assert!((sum - 1.0).abs() < 1e-9, "state {state} sums to {sum}");
    }
}

#[test]
fn label_for_unknown_state_is_rejected() {
    let dir = TempDir::new().unwrap();
    let files = write_input(&dir);
    fs::write(dir.path().join("model.lab"), "header\n9: ghost\n").unwrap();

    let err = files.load().unwrap_err();
    assert!(
        matches!(err, Error::StateOutOfRange { state: 9, num_states: 4 }),
        "got {err:?}"
    );
}

#[test]
fn missing_file_names_the_operation() {
    let dir = TempDir::new().unwrap();
    let files = TextModelFiles::new(dir.path().join("nope.lab"), dir.path().join("nope.tra"));
    let err = files.load().unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("nope.lab"), "got {err}");
}

#[test]
fn state_without_transitions_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let files = write_input(&dir);
    fs::write(dir.path().join("model.tra"), "3 2\n0 1 1.0\n1 0 1.0\n").unwrap();

    let model = files.load().unwrap();
    let err = SamplingPipeline::new(config())
        .run(&model.transitions)
        .unwrap_err();
    assert!(matches!(err, Error::EmptyTransitions { state: 2 }));
}

#[test]
fn in_memory_store_captures_result() {
    let dir = TempDir::new().unwrap();
    let model = write_input(&dir).load().unwrap();
    let store = InMemoryModelStore::new(model);

    let loaded = store.load().unwrap();
    let run = SamplingPipeline::new(config()).run(&loaded.transitions).unwrap();
    store.store(&loaded.labels, &run.result).unwrap();

    let (labels, result) = store.stored().expect("result should be stored");
    assert_eq!(labels, loaded.labels);
    assert!(result.is_complete());
}

#[test]
fn report_round_trips_through_json() {
    let dir = TempDir::new().unwrap();
    let model = write_input(&dir).load().unwrap();
    let config = config();
    let run = SamplingPipeline::new(config.clone())
        .run(&model.transitions)
        .unwrap();

    let path = dir.path().join("report.json");
    let report = RunReport::new(&config, &run);
    report.save(&path).unwrap();
    let loaded = RunReport::load(&path).unwrap();

    assert_eq!(loaded.states, report.states);
    assert_eq!(loaded.config.workers(), 4);
    assert_eq!(loaded.config.seed(), Some(2024));
    assert_eq!(loaded.summary.total_samples, run.summary.total_samples);
    assert_eq!(loaded.states.len(), 4);
    assert_eq!(loaded.summary.sampled_states, 2);
    assert!(loaded.states[1].deterministic);
}

#[test]
fn smoothing_residual_below_zero_loads_back() {
    let mut model = TransitionModel::new(4);
    model.push(StateId::new(0), StateId::new(1), 0.3).unwrap();
    model.push(StateId::new(0), StateId::new(2), 0.6).unwrap();
    model.push(StateId::new(0), StateId::new(3), 0.1).unwrap();
    model.push(StateId::new(0), StateId::new(0), 0.0).unwrap();
    for state in 1..4 {
        model
            .push(StateId::new(state), StateId::new(state), 1.0)
            .unwrap();
    }

    // The last successor never came up in 28 draws
    let mut tally = CountTally::new();
    tally.add(StateId::new(1), 9);
    tally.add(StateId::new(2), 18);
    tally.add(StateId::new(3), 1);
    let mut estimated = estimate(&tally, 28, model.successors(StateId::new(0)));
    smooth(&mut estimated);
    let residual = estimated[3].probability;
    assert!(residual.abs() < 1e-12, "residual {residual}");

    let mut result = ResultModel::shaped_like(&model);
    result.record(StateId::new(0), estimated).unwrap();
    for state in 1..4 {
        let successors = model.successors(StateId::new(state)).to_vec();
        result.record(StateId::new(state), successors).unwrap();
    }

    let mut written = Vec::new();
    write_transitions(&mut written, &result).unwrap();
    let reloaded = parse_transitions(Cursor::new(written), Path::new("sampled.tra")).unwrap();

    assert_eq!(reloaded.num_transitions(), 7);
    assert_eq!(reloaded.successors(StateId::new(0))[3].probability, residual);
}

#[test]
fn report_with_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let model = write_input(&dir).load().unwrap();
    let config = config();
    let run = SamplingPipeline::new(config.clone())
        .run(&model.transitions)
        .unwrap();

    let mut json = serde_json::to_value(RunReport::new(&config, &run)).unwrap();
    json["config"]["accuracy"]["epsilon"] = serde_json::json!(0.0);
    let path = dir.path().join("report.json");
    fs::write(&path, json.to_string()).unwrap();

    let err = RunReport::load(&path).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)), "got {err:?}");
    assert!(err.to_string().contains("epsilon"), "got {err}");
}
