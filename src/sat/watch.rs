#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Watch lists for unit propagation.
use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// Indices of the clauses watching one literal.
pub type WatchList = SmallVec<[usize; 6]>;

/// Two-watched-literal index: for every literal, the clauses currently watching it.
/// A clause watches its first two literals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchedLiterals(Vec<WatchList>);

impl WatchedLiterals {
    /// Empty lists for both literals of `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![WatchList::new(); num_vars * 2])
    }

    /// Adds the lists of a freshly allocated variable.
    pub fn add_variable(&mut self) {
        self.0.push(WatchList::new());
        self.0.push(WatchList::new());
    }

    /// Registers clause `idx` under its first two literals.
    ///
    /// # Panics
    ///
    /// If the clause has fewer than two literals.
    pub fn add_clause(&mut self, clause: &Clause, idx: usize) {
        let a = clause[0];
        let b = clause[1];

        debug_assert_ne!(a, b);

        self[a].push(idx);
        self[b].push(idx);
    }

    /// Takes the watch list of `lit`, leaving it empty.
    pub fn take(&mut self, lit: Literal) -> WatchList {
        std::mem::take(&mut self[lit])
    }

    /// Puts back a list taken with [`Self::take`], keeping anything pushed meanwhile.
    pub fn restore(&mut self, lit: Literal, mut list: WatchList) {
        list.extend(self[lit].drain(..));
        self[lit] = list;
    }
}

impl Index<Literal> for WatchedLiterals {
    type Output = WatchList;

    fn index(&self, index: Literal) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl IndexMut<Literal> for WatchedLiterals {
    fn index_mut(&mut self, index: Literal) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clause_watches_first_two() {
        let mut watches = WatchedLiterals::new(3);
        let clause = Clause::new(&[
            Literal::positive(0),
            Literal::negative(2),
            Literal::positive(1),
        ]);
        watches.add_clause(&clause, 7);

        assert_eq!(watches[Literal::positive(0)].as_slice(), &[7]);
        assert_eq!(watches[Literal::negative(2)].as_slice(), &[7]);
        assert!(watches[Literal::positive(1)].is_empty());
        assert!(watches[Literal::positive(2)].is_empty());
    }

    #[test]
    fn test_take_and_restore() {
        let mut watches = WatchedLiterals::new(1);
        let lit = Literal::positive(0);
        watches[lit].push(1);
        let taken = watches.take(lit);
        assert!(watches[lit].is_empty());
        watches[lit].push(2);
        watches.restore(lit, taken);
        assert_eq!(watches[lit].as_slice(), &[1, 2]);
    }
}
