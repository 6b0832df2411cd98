//! Disjunctions of literals.

use crate::sat::literal::Literal;
use core::ops::{Index, IndexMut};
use itertools::Itertools;
use smallvec::SmallVec;

/// Literal storage for a clause. Coloring clauses are binary except for the
/// at-least-one and blocking clauses, so a small inline buffer covers most of them.
pub type LiteralStorage = SmallVec<[Literal; 8]>;

/// A disjunction of literals. The CDCL backend watches the first two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    /// The literals, in the order the watch scheme currently keeps them.
    pub literals: LiteralStorage,
    /// Derived by conflict analysis rather than added by the caller.
    pub learnt: bool,
}

impl Clause {
    /// A problem clause over `literals`, kept as given.
    #[must_use]
    pub fn new(literals: &[Literal]) -> Self {
        Self {
            literals: literals.iter().copied().collect(),
            learnt: false,
        }
    }

    /// A learnt clause. The asserting literal comes first.
    #[must_use]
    pub fn learnt(literals: LiteralStorage) -> Self {
        Self {
            literals,
            learnt: true,
        }
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` for the empty clause.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// `true` for a single-literal clause.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Iterates over the literals.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Swaps the literals at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    /// A clause containing both `x` and `¬x` is trivially satisfied.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .map(|l| l.index())
            .sorted_unstable()
            .tuple_windows()
            .any(|(a, b)| a ^ 1 == b && a & 1 == 0)
    }

    /// Returns `true` if at least one literal is true under `value`.
    pub fn is_satisfied_by(&self, value: impl Fn(Literal) -> Option<bool>) -> bool {
        self.iter().any(|&lit| value(lit) == Some(true))
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(&literals)
    }
}

impl From<&[Literal]> for Clause {
    fn from(literals: &[Literal]) -> Self {
        Self::new(literals)
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self {
            literals: iter.into_iter().collect(),
            learnt: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(values: &[i32]) -> Vec<Literal> {
        values.iter().filter_map(|&v| Literal::from_i32(v)).collect()
    }

    #[test]
    fn test_new() {
        let clause = Clause::from(lits(&[1, 2, 3]));
        assert_eq!(clause.len(), 3);
        assert!(!clause.learnt);
    }

    #[test]
    fn test_swap() {
        let mut clause = Clause::from(lits(&[1, 2, 3]));
        clause.swap(0, 2);
        assert_eq!(clause[0], Literal::positive(2));
        assert_eq!(clause[2], Literal::positive(0));
    }

    #[test]
    fn test_tautology() {
        assert!(Clause::from(lits(&[1, -2, 2])).is_tautology());
        assert!(!Clause::from(lits(&[1, -2, 3])).is_tautology());
        assert!(!Clause::from(lits(&[-1, 2])).is_tautology());
        assert!(!Clause::default().is_tautology());
    }

    #[test]
    fn test_satisfied_by() {
        let clause = Clause::from(lits(&[1, -2]));
        assert!(clause.is_satisfied_by(|l| Some(l == Literal::negative(1))));
        assert!(!clause.is_satisfied_by(|_| None));
    }
}
