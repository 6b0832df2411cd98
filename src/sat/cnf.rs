//! The problem formula as handed to a backend.
//!
//! `Cnf` keeps the clauses exactly as they were added (learnt clauses live in the
//! solver, not here), so it is what gets exported to DIMACS and what models are
//! verified against.

use crate::sat::assignment::VarState;
use crate::sat::clause::Clause;
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;
use std::fmt::{Display, Formatter};

/// A conjunction of clauses over `num_vars` variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// Clauses in the order they were added.
    pub clauses: Vec<Clause>,
    /// Number of variables, at least one past the largest used.
    pub num_vars: usize,
}

impl Cnf {
    /// An empty formula over `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            clauses: Vec::new(),
            num_vars,
        }
    }

    /// Builds a formula from DIMACS-style integer clauses. Zeros are ignored and the
    /// variable count is derived from the largest variable seen.
    #[must_use]
    pub fn from_dimacs_clauses<I, C>(clauses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i32>,
    {
        let mut cnf = Self::default();
        for clause in clauses {
            let clause: Clause = clause.into_iter().filter_map(Literal::from_i32).collect();
            cnf.push(clause);
        }
        cnf
    }

    /// Appends a clause, growing `num_vars` to cover its variables.
    pub fn push(&mut self, clause: Clause) {
        if let Some(max) = clause.iter().map(|l| l.variable()).max() {
            self.num_vars = self.num_vars.max(max as usize + 1);
        }
        self.clauses.push(clause);
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// `true` if there are no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates over the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Checks that `model` satisfies every clause. Unknown values satisfy nothing.
    #[must_use]
    pub fn verify(&self, model: &[VarState]) -> bool {
        let value = |lit: Literal| {
            model
                .get(lit.variable() as usize)
                .and_then(|s| s.as_bool())
                .map(|b| b == lit.polarity())
        };
        self.clauses.iter().all(|c| c.is_satisfied_by(&value))
    }

    /// Variables in `0..num_vars`.
    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        (0..self.num_vars).map(|v| v as Variable)
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

/// Renders the formula in DIMACS CNF.
impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause.iter() {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dimacs_clauses() {
        let cnf = Cnf::from_dimacs_clauses(vec![vec![1, -2, 0], vec![3]]);
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.num_literals(), 3);
        assert_eq!(cnf[0][1], Literal::negative(1));
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::from_dimacs_clauses(vec![vec![1, 2], vec![-1]]);
        let good = [VarState::Assigned(false), VarState::Assigned(true)];
        let bad = [VarState::Assigned(true), VarState::Assigned(true)];
        let partial = [VarState::Assigned(false), VarState::Unassigned];
        assert!(cnf.verify(&good));
        assert!(!cnf.verify(&bad));
        assert!(!cnf.verify(&partial));
    }

    #[test]
    fn test_display_dimacs() {
        let cnf = Cnf::from_dimacs_clauses(vec![vec![1, -2], vec![2]]);
        assert_eq!(cnf.to_string(), "p cnf 2 2\n1 -2 0\n2 0\n");
    }

    #[test]
    fn test_empty_clause_is_never_satisfied() {
        let mut cnf = Cnf::new(1);
        cnf.push(Clause::default());
        assert!(!cnf.verify(&[VarState::Assigned(true)]));
    }
}
