#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Incremental Conflict-Driven Clause Learning backend.
//!
//! The solver keeps one clause database for problem and learnt clauses, watches
//! the first two literals of every clause, learns a first-UIP clause per conflict
//! and backjumps non-chronologically. Between `solve` calls it sits at decision
//! level 0, so new clauses (for example blocking clauses during model enumeration)
//! can be added at any time; learnt clauses survive across calls.

use crate::sat::assignment::{VarState, VecAssignment};
use crate::sat::clause::{Clause, LiteralStorage};
use crate::sat::cnf::Cnf;
use crate::sat::conflict_analysis::analyse_conflict;
use crate::sat::literal::{Literal, Variable};
use crate::sat::phase_saving::SavedPhases;
use crate::sat::restarter::{Luby, Restarter};
use crate::sat::solver::{
    BackendError, BackendLimits, SolutionStats, SolveResult, Solver, check_literals,
};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::{VariableSelection, Vsids};
use crate::sat::watch::WatchedLiterals;
use bit_vec::BitVec;
use tracing::{debug, trace};

/// Incremental CDCL backend, generic over its branching heuristic and restart
/// schedule.
#[derive(Debug, Clone)]
pub struct Cdcl<V: VariableSelection = Vsids, R: Restarter = Luby<100>> {
    /// Clauses as added by the caller, for export and verification.
    cnf: Cnf,
    /// Search database: every non-trivial problem clause plus learnt clauses.
    clauses: Vec<Clause>,
    watches: WatchedLiterals,
    assignment: VecAssignment,
    trail: Trail,
    selector: V,
    phases: SavedPhases,
    restarter: R,
    seen: BitVec,
    limits: BackendLimits,
    /// Cleared once a conflict is derived at the root.
    ok: bool,
    model: Vec<VarState>,
    stats: SolutionStats,
}

impl Default for Cdcl {
    fn default() -> Self {
        Self::new(BackendLimits::default())
    }
}

impl<V: VariableSelection, R: Restarter> Cdcl<V, R> {
    /// An empty solver with default heuristics, bounded by `limits`.
    #[must_use]
    pub fn new(limits: BackendLimits) -> Self {
        Self::from_parts(V::new(0), R::new(), limits)
    }

    /// Builds an empty solver around explicit heuristics.
    #[must_use]
    pub fn from_parts(selector: V, restarter: R, limits: BackendLimits) -> Self {
        Self {
            cnf: Cnf::default(),
            clauses: Vec::new(),
            watches: WatchedLiterals::new(0),
            assignment: VecAssignment::new(0),
            trail: Trail::new(0),
            selector,
            phases: SavedPhases::new(0),
            restarter,
            seen: BitVec::new(),
            limits,
            ok: true,
            model: Vec::new(),
            stats: SolutionStats::default(),
        }
    }

    /// Number of clauses learnt and still held in the database.
    #[must_use]
    pub fn num_learnt(&self) -> usize {
        self.clauses.iter().filter(|c| c.learnt).count()
    }

    fn enqueue(&mut self, lit: Literal, reason: Reason) {
        self.assignment.assign(lit);
        self.trail.push(lit, reason);
    }

    fn backtrack_to(&mut self, level: usize) {
        self.trail
            .backstep_to(&mut self.assignment, &mut self.phases, level);
    }

    /// Adds a clause of two or more literals to the database and watches it.
    fn attach(&mut self, clause: Clause) -> usize {
        let idx = self.clauses.len();
        self.watches.add_clause(&clause, idx);
        self.clauses.push(clause);
        idx
    }

    /// Unit propagation over the two-watched-literal scheme. Returns the index of
    /// a falsified clause, if any.
    fn propagate(&mut self) -> Option<usize> {
        while self.trail.curr_idx < self.trail.len() {
            let false_lit = self.trail[self.trail.curr_idx].lit.negated();
            self.trail.curr_idx += 1;
            self.stats.propagations += 1;

            let mut watchers = self.watches.take(false_lit);
            let mut conflict = None;
            let mut i = 0;

            while i < watchers.len() {
                let cref = watchers[i];
                let clause = &mut self.clauses[cref];

                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }
                let first = clause[0];
                if self.assignment.literal_value(first) == Some(true) {
                    i += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&k| self.assignment.literal_value(clause[k]) != Some(false));
                if let Some(k) = replacement {
                    clause.swap(1, k);
                    let new_watch = clause[1];
                    self.watches[new_watch].push(cref);
                    watchers.swap_remove(i);
                    continue;
                }

                if self.assignment.literal_value(first) == Some(false) {
                    conflict = Some(cref);
                    break;
                }
                self.enqueue(first, Reason::Clause(cref));
                i += 1;
            }

            self.watches.restore(false_lit, watchers);

            if conflict.is_some() {
                self.trail.curr_idx = self.trail.len();
                return conflict;
            }
        }
        None
    }

    /// Learns from the conflict in clause `conflict`, backjumps and asserts the
    /// learnt literal.
    fn learn(&mut self, conflict: usize) {
        let analysis = analyse_conflict(&self.clauses, &self.trail, conflict, &mut self.seen);
        self.selector.bumps(analysis.bumped.iter().copied());
        self.selector.decay();
        self.backtrack_to(analysis.backtrack_level);

        let asserting = analysis.learnt[0];
        if analysis.learnt.len() == 1 {
            self.enqueue(asserting, Reason::Unit);
        } else {
            let cref = self.attach(Clause::learnt(analysis.learnt));
            self.enqueue(asserting, Reason::Clause(cref));
        }
        self.stats.learnt_clauses += 1;
    }

    fn search(&mut self) -> SolveResult {
        loop {
            if let Some(conflict) = self.propagate() {
                self.stats.conflicts += 1;
                if self.trail.decision_level() == 0 {
                    debug!(conflicts = self.stats.conflicts, "conflict at root level");
                    self.ok = false;
                    return SolveResult::Unsat;
                }
                self.learn(conflict);

                if self.restarter.should_restart() {
                    trace!(restarts = self.restarter.num_restarts(), "restarting");
                    self.stats.restarts += 1;
                    self.backtrack_to(0);
                }
                continue;
            }

            let Some(var) = self.selector.pick(&self.assignment) else {
                self.model = self.assignment.to_model();
                return SolveResult::Sat;
            };

            self.stats.decisions += 1;
            self.trail.new_decision_level();
            let lit = self.phases.next_literal(var);
            self.enqueue(lit, Reason::Decision);
        }
    }
}

impl<V: VariableSelection, R: Restarter> Solver for Cdcl<V, R> {
    fn new_var(&mut self) -> Result<Variable, BackendError> {
        let num_vars = self.assignment.len();
        self.limits.check_variable(num_vars)?;

        self.assignment.add_variable();
        self.trail.add_variable();
        self.watches.add_variable();
        self.selector.add_variable();
        self.phases.add_variable();
        self.seen.push(false);
        self.cnf.num_vars = num_vars + 1;

        Ok(num_vars as Variable)
    }

    fn add_clause(&mut self, literals: &[Literal]) -> Result<(), BackendError> {
        check_literals(literals, self.assignment.len())?;
        self.limits.check_clause(self.cnf.len())?;

        let clause = Clause::new(literals);
        let tautology = clause.is_tautology();
        self.cnf.push(clause);

        if !self.ok || tautology {
            return Ok(());
        }

        self.backtrack_to(0);

        let mut simplified = LiteralStorage::new();
        for &lit in literals {
            match self.assignment.literal_value(lit) {
                Some(true) => return Ok(()),
                Some(false) => {}
                None if !simplified.contains(&lit) => simplified.push(lit),
                None => {}
            }
        }

        match simplified.len() {
            0 => {
                debug!(clauses = self.cnf.len(), "clause falsified at root level");
                self.ok = false;
            }
            1 => {
                self.enqueue(simplified[0], Reason::Unit);
                if self.propagate().is_some() {
                    debug!(clauses = self.cnf.len(), "unit clause conflicts at root level");
                    self.ok = false;
                }
            }
            _ => {
                self.attach(Clause::new(&simplified));
            }
        }
        Ok(())
    }

    fn solve(&mut self) -> SolveResult {
        self.stats.solves += 1;
        self.model.clear();

        let result = if self.ok {
            self.backtrack_to(0);
            self.search()
        } else {
            SolveResult::Unsat
        };

        self.backtrack_to(0);
        debug!(
            %result,
            vars = self.assignment.len(),
            clauses = self.clauses.len(),
            conflicts = self.stats.conflicts,
            decisions = self.stats.decisions,
            "cdcl solve finished"
        );
        result
    }

    fn model_value(&self, var: Variable) -> VarState {
        self.model.get(var as usize).copied().unwrap_or_default()
    }

    fn model(&self) -> Vec<VarState> {
        self.model.clone()
    }

    fn num_vars(&self) -> usize {
        self.assignment.len()
    }

    fn num_clauses(&self) -> usize {
        self.cnf.len()
    }

    fn is_consistent(&self) -> bool {
        self.ok
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }

    fn cnf(&self) -> &Cnf {
        &self.cnf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::restarter::Never;
    use crate::sat::variable_selection::FixedOrder;

    fn solver_with(num_vars: usize, clauses: &[&[i32]]) -> Cdcl {
        let mut solver = Cdcl::default();
        for _ in 0..num_vars {
            solver.new_var().unwrap();
        }
        for clause in clauses {
            let lits: Vec<Literal> = clause.iter().filter_map(|&l| Literal::from_i32(l)).collect();
            solver.add_clause(&lits).unwrap();
        }
        solver
    }

    #[test]
    fn test_simple_sat() {
        let mut solver = solver_with(3, &[&[1, 2], &[-1, 3], &[-3, -2]]);
        assert_eq!(solver.solve(), SolveResult::Sat);
        assert!(solver.cnf().verify(&solver.model()));
    }

    #[test]
    fn test_simple_unsat() {
        let mut solver = solver_with(2, &[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(!solver.is_consistent());
        assert_eq!(solver.solve(), SolveResult::Unsat);
    }

    #[test]
    fn test_variables_allocated_in_order() {
        let mut solver = Cdcl::default();
        assert_eq!(solver.new_var(), Ok(0));
        assert_eq!(solver.new_var(), Ok(1));
        assert_eq!(solver.num_vars(), 2);
    }

    #[test]
    fn test_incremental_blocking() {
        // x0 ∨ x1 has three models over two variables.
        let mut solver = solver_with(2, &[&[1, 2]]);
        let mut models = Vec::new();
        while solver.solve().is_sat() {
            let model = solver.model();
            let block: Vec<Literal> = model
                .iter()
                .enumerate()
                .map(|(v, s)| Literal::new(v as Variable, !s.is_true()))
                .collect();
            models.push(model);
            solver.add_clause(&block).unwrap();
        }
        assert_eq!(models.len(), 3);
        models.sort();
        models.dedup();
        assert_eq!(models.len(), 3);
    }

    #[test]
    fn test_empty_clause_makes_inconsistent() {
        let mut solver = solver_with(1, &[]);
        solver.add_clause(&[]).unwrap();
        assert!(!solver.is_consistent());
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert_eq!(solver.num_clauses(), 1);
    }

    #[test]
    fn test_unknown_variable_rejected() {
        let mut solver = solver_with(1, &[]);
        let err = solver.add_clause(&[Literal::positive(4)]).unwrap_err();
        assert_eq!(
            err,
            BackendError::UnknownVariable {
                variable: 4,
                num_vars: 1
            }
        );
    }

    #[test]
    fn test_limits_enforced() {
        let mut solver: Cdcl = Cdcl::new(
            BackendLimits::default()
                .with_max_variables(1)
                .with_max_clauses(1),
        );
        solver.new_var().unwrap();
        assert_eq!(
            solver.new_var(),
            Err(BackendError::VariableLimit { limit: 1 })
        );
        solver.add_clause(&[Literal::positive(0)]).unwrap();
        assert_eq!(
            solver.add_clause(&[Literal::negative(0)]),
            Err(BackendError::ClauseLimit { limit: 1 })
        );
        assert!(solver.is_consistent());
    }

    #[test]
    fn test_model_unknown_before_solve() {
        let solver = solver_with(2, &[&[1]]);
        assert_eq!(solver.model_value(0), VarState::Unassigned);
    }

    #[test]
    fn test_pigeonhole_three_into_two_unsat() {
        // p(i,j): pigeon i in hole j, var = 2 * i + j
        let mut clauses: Vec<Vec<i32>> = Vec::new();
        for i in 0..3 {
            clauses.push(vec![2 * i + 1, 2 * i + 2]);
        }
        for j in 0..2 {
            for a in 0..3 {
                for b in (a + 1)..3 {
                    clauses.push(vec![-(2 * a + j + 1), -(2 * b + j + 1)]);
                }
            }
        }
        let refs: Vec<&[i32]> = clauses.iter().map(Vec::as_slice).collect();
        let mut solver = solver_with(6, &refs);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(solver.stats().conflicts > 0);
    }

    #[test]
    fn test_other_heuristics() {
        let mut solver: Cdcl<FixedOrder, Never> = Cdcl::new(BackendLimits::default());
        for _ in 0..3 {
            solver.new_var().unwrap();
        }
        solver
            .add_clause(&[Literal::negative(0), Literal::positive(1)])
            .unwrap();
        solver
            .add_clause(&[Literal::negative(1), Literal::positive(2)])
            .unwrap();
        solver.add_clause(&[Literal::positive(0)]).unwrap();
        assert_eq!(solver.solve(), SolveResult::Sat);
        assert_eq!(solver.model_value(2), VarState::Assigned(true));
    }
}
