//! Phase saving.

use crate::sat::literal::{Literal, Variable};
use bit_vec::BitVec;

/// Last polarity each variable was assigned. Decisions reuse it, so the search
/// tends to return to the region of the space it just left.
///
/// Unseen variables default to `false`: for one-hot encodings that makes the
/// solver try "not this value" first and let the at-least-one clause pick.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SavedPhases(BitVec);

impl SavedPhases {
    /// `n` variables, all with phase `false`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self(BitVec::from_elem(n, false))
    }

    /// Makes room for a freshly allocated variable.
    pub fn add_variable(&mut self) {
        self.0.push(false);
    }

    /// Remembers the polarity of `lit`.
    pub fn save(&mut self, lit: Literal) {
        self.0.set(lit.variable() as usize, lit.polarity());
    }

    /// Saved polarity of `var`.
    #[must_use]
    pub fn get(&self, var: Variable) -> bool {
        self.0.get(var as usize).unwrap_or(false)
    }

    /// The decision literal for `var` under the saved phase.
    #[must_use]
    pub fn next_literal(&self, var: Variable) -> Literal {
        Literal::new(var, self.get(var))
    }

    /// Forgets every saved phase.
    pub fn reset(&mut self) {
        self.0.clear();
    }
}
