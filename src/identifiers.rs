//! Identifier newtypes for states and labels of a transition system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a state in `[0, num_states)`.
///
/// States have no lifecycle of their own; they are identified purely by
/// their position in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    /// Create a new state identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use sul_sampling::identifiers::StateId;
    ///
    /// let state = StateId::new(3);
    /// assert_eq!(state.index(), 3);
    /// ```
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the underlying index.
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<StateId> for usize {
    fn from(state: StateId) -> Self {
        state.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque label attached to a state: the 32-bit hash of its label token.
///
/// The hash is the classic `h = 31 * h + unit` string hash over UTF-16 code
/// units with wrapping `i32` arithmetic, which keeps label values identical to
/// those found in existing label files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabelHash(i32);

impl LabelHash {
    /// Hash a label token.
    ///
    /// # Examples
    ///
    /// ```
    /// use sul_sampling::identifiers::LabelHash;
    ///
    /// assert_eq!(LabelHash::of("").value(), 0);
    /// assert_eq!(LabelHash::of("a").value(), 97);
    /// assert_eq!(LabelHash::of("ab").value(), 97 * 31 + 98);
    /// ```
    pub fn of(token: &str) -> Self {
        let hash = token
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(hash)
    }

    /// Wrap an already-computed hash value.
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw hash value.
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for LabelHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_hash_matches_reference_values() {
        // Reference values of the 31-multiplier string hash.
        assert_eq!(LabelHash::of("hello").value(), 99_162_322);
        assert_eq!(LabelHash::of("init").value(), 3_237_136);
    }

    #[test]
    fn label_hash_wraps_on_long_tokens() {
        let hash = LabelHash::of("a fairly long label token that overflows");
        assert_eq!(hash, LabelHash::of("a fairly long label token that overflows"));
        assert_ne!(hash, LabelHash::of("a fairly long label token that overflowz"));
    }

    #[test]
    fn state_id_orders_by_index() {
        let mut states = vec![StateId::new(2), StateId::new(0), StateId::new(1)];
        states.sort();
        assert_eq!(states, vec![StateId::new(0), StateId::new(1), StateId::new(2)]);
    }
}
