#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The assignment trail of the CDCL backend.

use crate::sat::assignment::VecAssignment;
use crate::sat::literal::{Literal, Variable};
use crate::sat::phase_saving::SavedPhases;
use std::ops::Index;

/// Why a literal is on the trail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// Chosen by the branching heuristic.
    #[default]
    Decision,
    /// Forced at the root by a unit clause.
    Unit,
    /// Implied by the clause at this index in the clause database.
    Clause(usize),
}

/// One assigned literal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step {
    /// The literal made true.
    pub lit: Literal,
    /// Decision level it was assigned at.
    pub decision_level: usize,
    /// Why it was assigned.
    pub reason: Reason,
}

/// Assigned literals in assignment order, partitioned into decision levels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    t: Vec<Step>,
    /// Position of the next literal to propagate.
    pub curr_idx: usize,
    level_starts: Vec<usize>,
    var_level: Vec<usize>,
    var_reason: Vec<Reason>,
}

impl Index<usize> for Trail {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl Trail {
    /// An empty trail for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            t: Vec::with_capacity(num_vars),
            curr_idx: 0,
            level_starts: Vec::new(),
            var_level: vec![0; num_vars],
            var_reason: vec![Reason::Decision; num_vars],
        }
    }

    /// Makes room for a freshly allocated variable.
    pub fn add_variable(&mut self) {
        self.var_level.push(0);
        self.var_reason.push(Reason::Decision);
    }

    /// Current decision level; 0 is the root.
    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.level_starts.len()
    }

    /// Number of assigned literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// `true` if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Steps in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.t.iter()
    }

    /// Decision level `var` was assigned at.
    #[must_use]
    pub fn level(&self, var: Variable) -> usize {
        self.var_level[var as usize]
    }

    /// Why `var` was assigned.
    #[must_use]
    pub fn reason(&self, var: Variable) -> Reason {
        self.var_reason[var as usize]
    }

    /// Opens a new decision level.
    pub fn new_decision_level(&mut self) {
        self.level_starts.push(self.t.len());
    }

    /// Records `lit` at the current decision level. The caller assigns it.
    pub fn push(&mut self, lit: Literal, reason: Reason) {
        let decision_level = self.decision_level();
        let var = lit.variable() as usize;
        self.var_level[var] = decision_level;
        self.var_reason[var] = reason;
        self.t.push(Step {
            lit,
            decision_level,
            reason,
        });
    }

    /// Undoes every assignment above `level`, saving the phases of the undone
    /// variables.
    pub fn backstep_to(&mut self, a: &mut VecAssignment, phases: &mut SavedPhases, level: usize) {
        if level >= self.decision_level() {
            return;
        }

        let truncate_at = self.level_starts[level];
        for step in self.t.drain(truncate_at..) {
            let var = step.lit.variable();
            phases.save(step.lit);
            a.unassign(var);
            self.var_level[var as usize] = 0;
            self.var_reason[var as usize] = Reason::Decision;
        }
        self.level_starts.truncate(level);
        self.curr_idx = self.curr_idx.min(truncate_at);
    }
}
