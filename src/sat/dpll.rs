#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A classical DPLL (Davis-Putnam-Logemann-Loveland) backend.
//!
//! The solver keeps the clauses it is given and answers every `solve` call by
//! searching from scratch:
//! 1.  **Unit Propagation:** a clause with a single unassigned literal and no true
//!     literal forces that literal. Repeated until nothing changes or a clause is
//!     falsified.
//! 2.  **Decision:** the lowest unassigned variable is tried false, then true.
//! 3.  **Backtracking:** chronological. Open decisions sit on an explicit stack and
//!     assigned literals on an undo trail, so search depth is bounded by the heap,
//!     not the call stack, and memory stays linear in the number of variables.
//!
//! There is no learning, so it is only practical for small formulas. It serves as
//! an independent reference to check the CDCL backend against.

use crate::sat::assignment::{VarState, VecAssignment};
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::solver::{
    BackendError, BackendLimits, SolutionStats, SolveResult, Solver, check_literals,
};
use tracing::debug;

/// Recursion-free DPLL backend without learning.
#[derive(Debug, Clone)]
pub struct Dpll {
    cnf: Cnf,
    num_vars: usize,
    limits: BackendLimits,
    /// Cleared once an empty clause has been added.
    ok: bool,
    model: Vec<VarState>,
    stats: SolutionStats,
}

impl Default for Dpll {
    fn default() -> Self {
        Self::new(BackendLimits::default())
    }
}

/// Outcome of propagating units to a fixpoint.
enum Propagation {
    Conflict,
    Fixpoint,
}

/// An open decision: `var` was set false with the trail at length `mark`; once
/// `flipped`, it has been set true instead.
struct Decision {
    var: Variable,
    mark: usize,
    flipped: bool,
}

impl Dpll {
    /// An empty solver bounded by `limits`.
    #[must_use]
    pub fn new(limits: BackendLimits) -> Self {
        Self {
            cnf: Cnf::default(),
            num_vars: 0,
            limits,
            ok: true,
            model: Vec::new(),
            stats: SolutionStats::default(),
        }
    }

    fn clause_state(clause: &Clause, assignment: &VecAssignment) -> (bool, Option<Literal>, usize) {
        let mut unassigned = None;
        let mut open = 0;
        for &lit in clause.iter() {
            match assignment.literal_value(lit) {
                Some(true) => return (true, None, 0),
                Some(false) => {}
                None => {
                    open += 1;
                    unassigned = Some(lit);
                }
            }
        }
        (false, unassigned, open)
    }

    fn unit_propagate(
        &mut self,
        assignment: &mut VecAssignment,
        trail: &mut Vec<Literal>,
    ) -> Propagation {
        loop {
            let mut changed = false;
            for clause in &self.cnf.clauses {
                let (satisfied, last_open, open) = Self::clause_state(clause, assignment);
                if satisfied {
                    continue;
                }
                match (open, last_open) {
                    (0, _) => return Propagation::Conflict,
                    (1, Some(lit)) => {
                        assignment.assign(lit);
                        trail.push(lit);
                        self.stats.propagations += 1;
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return Propagation::Fixpoint;
            }
        }
    }

    fn undo(assignment: &mut VecAssignment, trail: &mut Vec<Literal>, mark: usize) {
        for lit in trail.drain(mark..) {
            assignment.unassign(lit.variable());
        }
    }

    /// Searches the lowest unassigned variable false-first, flipping the most
    /// recent unflipped decision on conflict.
    fn search(&mut self) -> Option<VecAssignment> {
        let mut assignment = VecAssignment::new(self.num_vars);
        let mut trail: Vec<Literal> = Vec::with_capacity(self.num_vars);
        let mut decisions: Vec<Decision> = Vec::new();

        loop {
            if let Propagation::Conflict = self.unit_propagate(&mut assignment, &mut trail) {
                self.stats.conflicts += 1;
                loop {
                    let decision = decisions.pop()?;
                    Self::undo(&mut assignment, &mut trail, decision.mark);
                    if !decision.flipped {
                        let lit = Literal::positive(decision.var);
                        assignment.assign(lit);
                        trail.push(lit);
                        decisions.push(Decision {
                            flipped: true,
                            ..decision
                        });
                        break;
                    }
                }
                continue;
            }

            let Some(var) = assignment.unassigned().next() else {
                return Some(assignment);
            };

            self.stats.decisions += 1;
            decisions.push(Decision {
                var,
                mark: trail.len(),
                flipped: false,
            });
            let lit = Literal::negative(var);
            assignment.assign(lit);
            trail.push(lit);
        }
    }
}

impl Solver for Dpll {
    fn new_var(&mut self) -> Result<Variable, BackendError> {
        self.limits.check_variable(self.num_vars)?;
        let var = self.num_vars as Variable;
        self.num_vars += 1;
        self.cnf.num_vars = self.num_vars;
        Ok(var)
    }

    fn add_clause(&mut self, literals: &[Literal]) -> Result<(), BackendError> {
        check_literals(literals, self.num_vars)?;
        self.limits.check_clause(self.cnf.len())?;
        if literals.is_empty() {
            self.ok = false;
        }
        self.cnf.push(Clause::new(literals));
        Ok(())
    }

    fn solve(&mut self) -> SolveResult {
        self.stats.solves += 1;
        self.model.clear();

        let found = if self.ok {
            self.search()
        } else {
            None
        };

        let result = match found {
            Some(assignment) => {
                self.model = assignment.to_model();
                SolveResult::Sat
            }
            None => {
                self.ok = false;
                SolveResult::Unsat
            }
        };
        debug!(
            %result,
            vars = self.num_vars,
            clauses = self.cnf.len(),
            decisions = self.stats.decisions,
            "dpll solve finished"
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
        self.num_vars
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
