//! Variable states and the assignment the backends search over.

use crate::sat::literal::{Literal, Variable};
use core::ops::{Index, IndexMut};
use std::fmt::{Display, Formatter};

/// Truth value of a variable: assigned true, assigned false, or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// No value yet.
    #[default]
    Unassigned,
    /// Assigned the given value.
    Assigned(bool),
}

impl VarState {
    /// `true` unless unassigned.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// `true` if unassigned.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }

    /// `true` if assigned true.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    /// `true` if assigned false.
    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::Assigned(false))
    }

    /// The value, if assigned.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<bool>> for VarState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unassigned, Self::Assigned)
    }
}

impl Display for VarState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned(true) => write!(f, "1"),
            Self::Assigned(false) => write!(f, "0"),
            Self::Unassigned => write!(f, "?"),
        }
    }
}

/// Per-variable assignment used during search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VecAssignment(Vec<VarState>);

impl Index<Variable> for VecAssignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<Variable> for VecAssignment {
    fn index_mut(&mut self, index: Variable) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

impl VecAssignment {
    /// `num_vars` unassigned variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars])
    }

    /// Grows the assignment by one unassigned variable.
    pub fn add_variable(&mut self) {
        self.0.push(VarState::Unassigned);
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal) {
        self[lit.variable()] = VarState::Assigned(lit.polarity());
    }

    /// Clears the value of `var`.
    pub fn unassign(&mut self, var: Variable) {
        self[var] = VarState::Unassigned;
    }

    /// Value of `var`, `None` if unassigned or unknown.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.0.get(var as usize).and_then(|s| s.as_bool())
    }

    /// Truth value of `lit`, `None` if its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable())
            .map(|b| b == lit.polarity())
    }

    /// Unassigned variables in index order.
    pub fn unassigned(&self) -> impl DoubleEndedIterator<Item = Variable> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_unassigned())
            .map(|(i, _)| i as Variable)
    }

    /// `true` once every variable has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|s| s.is_assigned())
    }

    /// Snapshot of every variable's state.
    #[must_use]
    pub fn to_model(&self) -> Vec<VarState> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_read() {
        let mut a = VecAssignment::new(3);
        a.assign(Literal::negative(1));
        assert_eq!(a.var_value(1), Some(false));
        assert_eq!(a.literal_value(Literal::negative(1)), Some(true));
        assert_eq!(a.literal_value(Literal::positive(1)), Some(false));
        assert_eq!(a.literal_value(Literal::positive(0)), None);
        assert_eq!(a.unassigned().collect::<Vec<_>>(), vec![0, 2]);

        a.unassign(1);
        assert!(a[1].is_unassigned());
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        let a = VecAssignment::new(1);
        assert_eq!(a.var_value(5), None);
    }

    #[test]
    fn test_var_state_display() {
        let rendered: String = [
            VarState::Assigned(true),
            VarState::Assigned(false),
            VarState::Unassigned,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(rendered, "10?");
    }
}
