//! Plain-text label and transition files.
//!
//! Input layout:
//!
//! - labels: a header line, then one `"<state>: <token>"` line per state; the
//!   stored label is [`LabelHash::of`] the token
//! - transitions: whitespace-separated `numStates numTransitions` followed by
//!   `numTransitions` triples `<source> <target> <probability>`
//!
//! Output layout:
//!
//! - labels: all label values as `[v1, v2, ...]`, then `"<state>: <hash>"`
//!   per labelled state
//! - transitions: `"<numStates> <numTransitions>"`, one `"<s> <t> <p>"` line
//!   per estimated transition, then an empty line

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    Error, Result,
    identifiers::{LabelHash, StateId},
    model::{Labels, Model, ResultModel, Transition, TransitionModel},
    ports::{ModelSource, ResultSink},
};

/// Input model stored as a label file and a transition file.
///
/// # Examples
///
/// ```no_run
/// use sul_sampling::adapters::TextModelFiles;
/// use sul_sampling::ports::ModelSource;
///
/// let files = TextModelFiles::new("model.lab", "model.tra");
/// let model = files.load()?;
/// println!("{} states", model.num_states());
/// # Ok::<(), sul_sampling::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TextModelFiles {
    labels: PathBuf,
    transitions: PathBuf,
}

impl TextModelFiles {
    pub fn new(labels: impl Into<PathBuf>, transitions: impl Into<PathBuf>) -> Self {
        Self {
            labels: labels.into(),
            transitions: transitions.into(),
        }
    }
}

impl ModelSource for TextModelFiles {
    fn load(&self) -> Result<Model> {
        let labels = parse_labels(open(&self.labels)?, &self.labels)?;
        let transitions = parse_transitions(open(&self.transitions)?, &self.transitions)?;

        let num_states = transitions.num_states();
        if let Some((state, _)) = labels.iter().find(|(state, _)| state.index() >= num_states) {
            return Err(Error::StateOutOfRange {
                state: state.index(),
                num_states,
            });
        }

        Ok(Model::new(transitions, labels))
    }
}

/// Estimated model written as a label file and a transition file.
#[derive(Debug, Clone)]
pub struct TextResultFiles {
    labels: PathBuf,
    transitions: PathBuf,
}

impl TextResultFiles {
    pub fn new(labels: impl Into<PathBuf>, transitions: impl Into<PathBuf>) -> Self {
        Self {
            labels: labels.into(),
            transitions: transitions.into(),
        }
    }
}

impl ResultSink for TextResultFiles {
    fn store(&self, labels: &Labels, result: &ResultModel) -> Result<()> {
        let mut out = create(&self.labels)?;
        write_labels(&mut out, labels)
            .and_then(|()| out.flush())
            .map_err(|source| Error::io(format!("write {}", self.labels.display()), source))?;

        let mut out = create(&self.transitions)?;
        write_transitions(&mut out, result)
            .and_then(|()| out.flush())
            .map_err(|source| Error::io(format!("write {}", self.transitions.display()), source))?;
        Ok(())
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::io(format!("open {}", path.display()), source))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::io(format!("create {}", path.display()), source))
}

fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

/// Parse a label file. `path` is only used in error messages.
///
/// The first line is a header and is skipped; blank lines are ignored.
///
/// # Errors
///
/// Returns [`Error::Parse`] for a line that is not `"<state>: <token>"`.
pub fn parse_labels<R: BufRead>(reader: R, path: &Path) -> Result<Labels> {
    let mut labels = Labels::new();
    for (index, line) in reader.lines().enumerate().skip(1) {
        let line_no = index + 1;
        let line = line.map_err(|source| Error::io(format!("read {}", path.display()), source))?;
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let (state, token) = line
            .split_once(':')
            .and_then(|(state, rest)| {
                let mut chars = rest.chars();
                chars
                    .next()
                    .filter(|c| c.is_whitespace())
                    .map(|_| (state, chars.as_str()))
            })
            .ok_or_else(|| parse_error(path, line_no, format!("expected '<state>: <label>', got '{line}'")))?;
        let state: usize = state
            .trim()
            .parse()
            .map_err(|_| parse_error(path, line_no, format!("invalid state '{}'", state.trim())))?;

        labels.insert(StateId::new(state), LabelHash::of(token));
    }
    Ok(labels)
}

/// Parse a transition file. `path` is only used in error messages.
///
/// Tokens may be spread over lines freely; anything after the declared
/// number of transitions is ignored.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed numbers,
/// [`Error::TransitionCountMismatch`] if the file ends early, and the errors of
/// [`TransitionModel::push`] for out-of-range states or bad probabilities.
pub fn parse_transitions<R: BufRead>(reader: R, path: &Path) -> Result<TransitionModel> {
    let mut tokens = Tokens::new(reader, path);

    let Some(num_states) = tokens.next_value::<usize>("number of states")? else {
        return Err(parse_error(path, 1, "missing number of states"));
    };
    let Some(num_transitions) = tokens.next_value::<usize>("number of transitions")? else {
        return Err(parse_error(path, 1, "missing number of transitions"));
    };

    let mut model = TransitionModel::new(num_states);
    for found in 0..num_transitions {
        let source = tokens.next_value::<usize>("source state")?;
        let target = tokens.next_value::<usize>("target state")?;
        let probability = tokens.next_value::<f64>("probability")?;
        let (Some(source), Some(target), Some(probability)) = (source, target, probability) else {
            return Err(Error::TransitionCountMismatch {
                expected: num_transitions,
                found,
            });
        };
        model.push(StateId::new(source), StateId::new(target), probability)?;
    }
    Ok(model)
}

/// Whitespace tokenizer that remembers line numbers for error messages.
struct Tokens<'a, R> {
    lines: std::io::Lines<R>,
    path: &'a Path,
    line_no: usize,
    pending: std::vec::IntoIter<String>,
}

impl<'a, R: BufRead> Tokens<'a, R> {
    fn new(reader: R, path: &'a Path) -> Self {
        Self {
            lines: reader.lines(),
            path,
            line_no: 0,
            pending: Vec::new().into_iter(),
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.next() {
                return Ok(Some(token));
            }
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line =
                line.map_err(|source| Error::io(format!("read {}", self.path.display()), source))?;
            self.line_no += 1;
            self.pending = line
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }

    fn next_value<T: FromStr>(&mut self, what: &str) -> Result<Option<T>> {
        match self.next_token()? {
            None => Ok(None),
            Some(token) => token
                .parse()
                .map(Some)
                .map_err(|_| parse_error(self.path, self.line_no, format!("invalid {what} '{token}'"))),
        }
    }
}

/// Render a probability in the shortest form that parses back to the same value.
fn format_probability(probability: f64) -> String {
    format!("{probability:?}")
}

/// Write labels in the output label-file layout.
pub fn write_labels<W: Write>(out: &mut W, labels: &Labels) -> std::io::Result<()> {
    let values: Vec<String> = labels.iter().map(|(_, label)| label.to_string()).collect();
    writeln!(out, "[{}]", values.join(", "))?;
    for (state, label) in labels.iter() {
        writeln!(out, "{state}: {label}")?;
    }
    Ok(())
}

/// Write estimated transitions in the output transition-file layout.
pub fn write_transitions<W: Write>(out: &mut W, result: &ResultModel) -> std::io::Result<()> {
    writeln!(out, "{} {}", result.num_states(), result.num_transitions())?;
    for (state, successors) in result.iter() {
        write_successors(out, state, successors)?;
    }
    writeln!(out)
}

/// Write a full dump of an input model: counts, labels, then every transition.
pub fn write_model_dump<W: Write>(out: &mut W, model: &Model) -> std::io::Result<()> {
    write_header(out, model.num_states(), model.num_transitions(), &model.labels)?;
    for (state, successors) in model.transitions.iter() {
        write_successors(out, state, successors)?;
    }
    writeln!(out)
}

/// Write the counts line followed by all labels on a single line.
pub fn write_header<W: Write>(
    out: &mut W,
    num_states: usize,
    num_transitions: usize,
    labels: &Labels,
) -> std::io::Result<()> {
    writeln!(out, "{num_states} {num_transitions}")?;
    let rendered: Vec<String> = labels
        .iter()
        .map(|(state, label)| format!("{state}: {label}"))
        .collect();
    writeln!(out, "{}", rendered.join(" "))
}

fn write_successors<W: Write>(out: &mut W, state: StateId, successors: &[Transition]) -> std::io::Result<()> {
    for transition in successors {
        writeln!(
            out,
            "{state} {} {}",
            transition.target,
            format_probability(transition.probability)
        )?;
    }
    Ok(())
}
