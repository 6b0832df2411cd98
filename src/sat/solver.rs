//! The capability every SAT backend offers to the encoders built on top of it.
//!
//! Encoders only ever talk to a backend through [`Solver`]: allocate variables,
//! add clauses, ask for satisfiability, read the model. Any implementation that
//! honours the contract below can be swapped in without touching encoding logic.

use crate::sat::assignment::VarState;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, MAX_VARIABLE, Variable};
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

/// Outcome of a decision query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveResult {
    /// A model was found.
    Sat,
    /// No model exists.
    Unsat,
}

impl SolveResult {
    /// `true` for [`SolveResult::Sat`].
    #[must_use]
    pub const fn is_sat(self) -> bool {
        matches!(self, Self::Sat)
    }
}

impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat => write!(f, "SATISFIABLE"),
            Self::Unsat => write!(f, "UNSATISFIABLE"),
        }
    }
}

/// Counters accumulated over every `solve` call on a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Calls to `solve`.
    pub solves: usize,
    /// Conflicts met during search.
    pub conflicts: usize,
    /// Branching decisions.
    pub decisions: usize,
    /// Propagated literals.
    pub propagations: usize,
    /// Restarts performed.
    pub restarts: usize,
    /// Clauses learnt from conflicts.
    pub learnt_clauses: usize,
}

/// Resource bounds for a backend. `None` means unbounded, apart from the ceiling
/// imposed by the literal encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendLimits {
    /// Most variables `new_var` may allocate.
    pub max_variables: Option<usize>,
    /// Most clauses `add_clause` may record.
    pub max_clauses: Option<usize>,
}

impl BackendLimits {
    /// No limits beyond the literal encoding.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_variables: None,
            max_clauses: None,
        }
    }

    #[must_use]
    /// Caps the number of variables.
    pub fn with_max_variables(mut self, max: usize) -> Self {
        self.max_variables = Some(max);
        self
    }

    #[must_use]
    /// Caps the number of clauses.
    pub fn with_max_clauses(mut self, max: usize) -> Self {
        self.max_clauses = Some(max);
        self
    }

    /// Effective variable ceiling.
    #[must_use]
    pub fn variable_limit(&self) -> usize {
        let hard = MAX_VARIABLE as usize + 1;
        self.max_variables.map_or(hard, |max| max.min(hard))
    }

    /// Fails if allocating one more variable would exceed the limit.
    ///
    /// # Errors
    ///
    /// `BackendError::VariableLimit` when `num_vars` already reached the ceiling.
    pub fn check_variable(&self, num_vars: usize) -> Result<(), BackendError> {
        let limit = self.variable_limit();
        if num_vars >= limit {
            return Err(BackendError::VariableLimit { limit });
        }
        Ok(())
    }

    /// Fails if recording one more clause would exceed the limit.
    ///
    /// # Errors
    ///
    /// `BackendError::ClauseLimit` when `num_clauses` already reached the ceiling.
    pub fn check_clause(&self, num_clauses: usize) -> Result<(), BackendError> {
        match self.max_clauses {
            Some(limit) if num_clauses >= limit => Err(BackendError::ClauseLimit { limit }),
            _ => Ok(()),
        }
    }
}

/// Reasons a backend refuses a variable or a clause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// `new_var` was called with the variable limit already reached.
    #[error("variable limit of {limit} reached")]
    VariableLimit {
        /// The configured limit.
        limit: usize,
    },

    /// `add_clause` was called with the clause limit already reached.
    #[error("clause limit of {limit} reached")]
    ClauseLimit {
        /// The configured limit.
        limit: usize,
    },

    /// A clause used a variable that was never allocated.
    #[error("clause mentions variable {variable} but only {num_vars} are allocated")]
    UnknownVariable {
        /// The offending variable.
        variable: Variable,
        /// Variables allocated at the time.
        num_vars: usize,
    },
}

/// Checks that every literal refers to an allocated variable.
///
/// # Errors
///
/// `BackendError::UnknownVariable` for the first literal outside `0..num_vars`.
pub fn check_literals(literals: &[Literal], num_vars: usize) -> Result<(), BackendError> {
    match literals.iter().find(|l| l.variable() as usize >= num_vars) {
        Some(lit) => Err(BackendError::UnknownVariable {
            variable: lit.variable(),
            num_vars,
        }),
        None => Ok(()),
    }
}

/// An incremental SAT backend.
///
/// Contract:
/// - `new_var` hands out indices in call order starting at 0.
/// - `add_clause` records a disjunction. A clause that is already falsified at the
///   root level makes the backend inconsistent; that is not an error, but every
///   later `solve` reports [`SolveResult::Unsat`].
/// - `solve` may be called repeatedly; clauses added in between are honoured.
/// - `model_value` is meaningful after a satisfiable `solve` and reports
///   [`VarState::Unassigned`] otherwise.
pub trait Solver {
    /// Allocates a fresh variable.
    ///
    /// # Errors
    ///
    /// `BackendError::VariableLimit` once the configured ceiling is reached.
    fn new_var(&mut self) -> Result<Variable, BackendError>;

    /// Adds the disjunction of `literals`.
    ///
    /// # Errors
    ///
    /// `BackendError::ClauseLimit` once the configured ceiling is reached, and
    /// `BackendError::UnknownVariable` if a literal uses an unallocated variable.
    fn add_clause(&mut self, literals: &[Literal]) -> Result<(), BackendError>;

    /// Decides satisfiability of everything added so far.
    fn solve(&mut self) -> SolveResult;

    /// Value of `var` in the last model found.
    fn model_value(&self, var: Variable) -> VarState;

    /// The whole last model, one entry per allocated variable.
    fn model(&self) -> Vec<VarState>;

    /// Variables allocated so far.
    fn num_vars(&self) -> usize;

    /// Number of clauses added through `add_clause` (learnt clauses excluded).
    fn num_clauses(&self) -> usize;

    /// `false` once a root-level conflict has been derived.
    fn is_consistent(&self) -> bool;

    /// Search counters over every `solve` call.
    fn stats(&self) -> SolutionStats;

    /// The clauses added so far, in the order they were added.
    fn cnf(&self) -> &Cnf;

    /// Serializes the added clauses as DIMACS CNF.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    fn write_dimacs<W: Write>(&self, writer: W) -> io::Result<()> {
        crate::sat::dimacs::write_dimacs(self.cnf(), writer)
    }

    /// Allocates any variables `cnf` needs and adds all of its clauses.
    ///
    /// # Errors
    ///
    /// Whatever `new_var` or `add_clause` report.
    fn add_cnf(&mut self, cnf: &Cnf) -> Result<(), BackendError> {
        while self.num_vars() < cnf.num_vars {
            self.new_var()?;
        }
        for clause in cnf.iter() {
            self.add_clause(&clause.literals)?;
        }
        Ok(())
    }
}
