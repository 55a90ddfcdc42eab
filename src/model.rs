//! Transition system data structures
//!
//! [`Model`] is the input handed over by a loader: the exact transition
//! distribution of every state plus the state labels. [`ResultModel`] has the
//! same shape and is filled in state by state with estimated probabilities.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Error, Result,
    identifiers::{LabelHash, StateId},
};

/// Tolerance used when checking that a loaded distribution sums to one.
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 1e-6;

/// A single outgoing edge: successor state and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: StateId,
    pub probability: f64,
}

impl Transition {
    pub fn new(target: StateId, probability: f64) -> Self {
        Self {
            target,
            probability,
        }
    }
}

/// Outgoing transitions of every state, in order of appearance.
///
/// The order of a state's successor list is canonical: sampling walks it to
/// build the cumulative distribution, and smoothing targets its last entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionModel {
    num_transitions: usize,
    transitions: Vec<Vec<Transition>>,
}

impl TransitionModel {
    /// Create a model with `num_states` states and no transitions.
    pub fn new(num_states: usize) -> Self {
        Self {
            num_transitions: 0,
            transitions: vec![Vec::new(); num_states],
        }
    }

    /// Append a transition to the end of `source`'s successor list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] if either endpoint is not a state of
    /// the model, and [`Error::InvalidProbability`] if `probability` is not
    /// finite or below `-DISTRIBUTION_SUM_TOLERANCE`. Smoothed output can
    /// carry residuals like `-2.2e-16` and must load back.
    pub fn push(&mut self, source: StateId, target: StateId, probability: f64) -> Result<()> {
        let num_states = self.num_states();
        for state in [source, target] {
            if state.index() >= num_states {
                return Err(Error::StateOutOfRange {
                    state: state.index(),
                    num_states,
                });
            }
        }
        if !probability.is_finite() || probability < -DISTRIBUTION_SUM_TOLERANCE {
            return Err(Error::InvalidProbability {
                source_state: source.index(),
                target: target.index(),
                value: probability,
            });
        }

        self.transitions[source.index()].push(Transition::new(target, probability));
        self.num_transitions += 1;
        Ok(())
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// Total number of transitions over all states.
    pub fn num_transitions(&self) -> usize {
        self.num_transitions
    }

    /// Successor list of `state` in canonical order.
    ///
    /// Returns an empty slice for states outside the model.
    pub fn successors(&self, state: StateId) -> &[Transition] {
        self.transitions
            .get(state.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over `(state, successors)` pairs in ascending state order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &[Transition])> + '_ {
        self.transitions
            .iter()
            .enumerate()
            .map(|(index, list)| (StateId::new(index), list.as_slice()))
    }

    /// Check that the model can be sampled.
    ///
    /// Every state must have at least one outgoing transition. Distributions
    /// that do not sum to one, and successors listed twice, are reported as
    /// warnings only: the exact probabilities are taken as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTransitions`] for the first state with no
    /// outgoing transitions.
    pub fn validate(&self) -> Result<()> {
        for (state, successors) in self.iter() {
            if successors.is_empty() {
                return Err(Error::EmptyTransitions {
                    state: state.index(),
                });
            }

            let sum: f64 = successors.iter().map(|t| t.probability).sum();
            if (sum - 1.0).abs() > DISTRIBUTION_SUM_TOLERANCE {
                warn!(state = state.index(), sum, "outgoing probabilities do not sum to 1");
            }

            let mut seen = HashSet::with_capacity(successors.len());
            for transition in successors {
                if !seen.insert(transition.target) {
                    warn!(
                        state = state.index(),
                        target = transition.target.index(),
                        "successor listed more than once"
                    );
                }
            }
        }
        Ok(())
    }
}

/// State labels, keyed by state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels(BTreeMap<StateId, LabelHash>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a label to a state, replacing any previous label.
    pub fn insert(&mut self, state: StateId, label: LabelHash) {
        self.0.insert(state, label);
    }

    pub fn get(&self, state: StateId) -> Option<LabelHash> {
        self.0.get(&state).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(state, label)` pairs in ascending state order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, LabelHash)> + '_ {
        self.0.iter().map(|(&state, &label)| (state, label))
    }
}

impl FromIterator<(StateId, LabelHash)> for Labels {
    fn from_iter<I: IntoIterator<Item = (StateId, LabelHash)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Input system under learning: exact transitions plus labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub transitions: TransitionModel,
    pub labels: Labels,
}

impl Model {
    pub fn new(transitions: TransitionModel, labels: Labels) -> Self {
        Self {
            transitions,
            labels,
        }
    }

    pub fn num_states(&self) -> usize {
        self.transitions.num_states()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.num_transitions()
    }
}

/// Estimated transition system, filled in one state at a time.
///
/// Each state's slot is written at most once and is never read before it
/// is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultModel {
    num_transitions: usize,
    slots: Vec<Option<Vec<Transition>>>,
}

impl ResultModel {
    /// Create an empty result shaped like `input`.
    pub fn shaped_like(input: &TransitionModel) -> Self {
        Self {
            num_transitions: input.num_transitions(),
            slots: vec![None; input.num_states()],
        }
    }

    /// Store the estimated successor list of `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] for a state outside the model and
    /// [`Error::ResultSlotAlreadyWritten`] if the slot is already filled.
    pub fn record(&mut self, state: StateId, transitions: Vec<Transition>) -> Result<()> {
        let num_states = self.num_states();
        let slot = self
            .slots
            .get_mut(state.index())
            .ok_or(Error::StateOutOfRange {
                state: state.index(),
                num_states,
            })?;
        if slot.is_some() {
            return Err(Error::ResultSlotAlreadyWritten {
                state: state.index(),
            });
        }
        *slot = Some(transitions);
        Ok(())
    }

    pub fn num_states(&self) -> usize {
        self.slots.len()
    }

    /// Transition count carried over from the input model.
    pub fn num_transitions(&self) -> usize {
        self.num_transitions
    }

    /// Estimated successors of `state`, or `None` if not yet recorded.
    pub fn successors(&self, state: StateId) -> Option<&[Transition]> {
        self.slots.get(state.index())?.as_deref()
    }

    /// Whether every state has been recorded.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Iterate over recorded `(state, successors)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &[Transition])> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_deref().map(|list| (StateId::new(index), list))
        })
    }

    /// Mutable access to every recorded successor list.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (StateId, &mut Vec<Transition>)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|list| (StateId::new(index), list)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(index: usize) -> StateId {
        StateId::new(index)
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut model = TransitionModel::new(3);
        model.push(s(0), s(2), 0.5).unwrap();
        model.push(s(0), s(1), 0.5).unwrap();
        let targets: Vec<_> = model.successors(s(0)).iter().map(|t| t.target).collect();
        assert_eq!(targets, vec![s(2), s(1)]);
        assert_eq!(model.num_transitions(), 2);
    }

    #[test]
    fn push_rejects_out_of_range_states() {
        let mut model = TransitionModel::new(2);
        let err = model.push(s(0), s(5), 1.0).unwrap_err();
        assert!(matches!(
            err,
            Error::StateOutOfRange {
                state: 5,
                num_states: 2
            }
        ));
    }

    #[test]
    fn push_rejects_negative_probability() {
        let mut model = TransitionModel::new(2);
        let err = model.push(s(0), s(1), -0.1).unwrap_err();
        assert!(matches!(err, Error::InvalidProbability { .. }));
    }

    #[test]
    fn push_accepts_rounding_residual() {
        let mut model = TransitionModel::new(2);
        model.push(s(0), s(1), 1.0).unwrap();
        model.push(s(0), s(0), -2.220446049250313e-16).unwrap();
        assert_eq!(model.num_transitions(), 2);

        let err = model.push(s(1), s(1), -1e-3).unwrap_err();
        assert!(matches!(err, Error::InvalidProbability { .. }));
    }

    #[test]
    fn validate_reports_state_without_successors() {
        let mut model = TransitionModel::new(3);
        model.push(s(0), s(1), 1.0).unwrap();
        model.push(s(2), s(2), 1.0).unwrap();
        let err = model.validate().unwrap_err();
        assert!(matches!(err, Error::EmptyTransitions { state: 1 }));
    }

    #[test]
    fn result_slots_are_write_once() {
        let input = TransitionModel::new(2);
        let mut result = ResultModel::shaped_like(&input);
        assert!(result.successors(s(0)).is_none());

        result.record(s(0), vec![Transition::new(s(1), 1.0)]).unwrap();
        let err = result
            .record(s(0), vec![Transition::new(s(0), 1.0)])
            .unwrap_err();
        assert!(matches!(err, Error::ResultSlotAlreadyWritten { state: 0 }));
        assert!(!result.is_complete());
    }

    #[test]
    fn labels_iterate_in_state_order() {
        let labels: Labels = [
            (s(2), LabelHash::from_raw(7)),
            (s(0), LabelHash::from_raw(3)),
        ]
        .into_iter()
        .collect();
        let states: Vec<_> = labels.iter().map(|(state, _)| state.index()).collect();
        assert_eq!(states, vec![0, 2]);
    }
}
