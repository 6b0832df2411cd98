//! Run-time backend selection.
//!
//! [`Solver`] has generic methods, so it is dispatched through an enum rather than
//! a trait object. [`BackendConfig`] collects the knobs exposed on the command line
//! and builds the matching [`BackendImpls`].

use crate::sat::assignment::VarState;
use crate::sat::cdcl::Cdcl;
use crate::sat::cnf::Cnf;
use crate::sat::dpll::Dpll;
use crate::sat::literal::{Literal, Variable};
use crate::sat::restarter::{RestarterImpls, RestarterType};
use crate::sat::solver::{BackendError, BackendLimits, SolutionStats, SolveResult, Solver};
use crate::sat::variable_selection::{VariableSelectionImpls, VariableSelectionType};
use clap::ValueEnum;
use std::fmt::{Display, Formatter};

/// Names of the SAT backends, as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum BackendType {
    /// Incremental CDCL with learning and restarts.
    #[default]
    Cdcl,
    /// Plain DPLL without learning, meant as a reference for small inputs.
    Dpll,
}

impl Display for BackendType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cdcl => write!(f, "cdcl"),
            Self::Dpll => write!(f, "dpll"),
        }
    }
}

/// A CDCL backend whose heuristics are chosen at run time.
pub type ConfiguredCdcl = Cdcl<VariableSelectionImpls, RestarterImpls>;

/// A backend chosen at run time.
#[derive(Debug, Clone)]
pub enum BackendImpls {
    /// CDCL with configured heuristics.
    Cdcl(Box<ConfiguredCdcl>),
    /// DPLL reference backend.
    Dpll(Dpll),
}

/// Everything needed to build a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendConfig {
    /// Which backend to build.
    pub backend: BackendType,
    /// Branching heuristic (CDCL only).
    pub variable_selection: VariableSelectionType,
    /// Restart schedule (CDCL only).
    pub restart_strategy: RestarterType,
    /// Resource bounds.
    pub limits: BackendLimits,
}

impl BackendConfig {
    /// Builds an empty backend. Heuristic choices are ignored by DPLL.
    #[must_use]
    pub fn build(&self) -> BackendImpls {
        match self.backend {
            BackendType::Cdcl => BackendImpls::Cdcl(Box::new(Cdcl::from_parts(
                self.variable_selection.to_impl(0),
                self.restart_strategy.to_impl(),
                self.limits,
            ))),
            BackendType::Dpll => BackendImpls::Dpll(Dpll::new(self.limits)),
        }
    }
}

impl Solver for BackendImpls {
    fn new_var(&mut self) -> Result<Variable, BackendError> {
        match self {
            Self::Cdcl(s) => s.new_var(),
            Self::Dpll(s) => s.new_var(),
        }
    }

    fn add_clause(&mut self, literals: &[Literal]) -> Result<(), BackendError> {
        match self {
            Self::Cdcl(s) => s.add_clause(literals),
            Self::Dpll(s) => s.add_clause(literals),
        }
    }

    fn solve(&mut self) -> SolveResult {
        match self {
            Self::Cdcl(s) => s.solve(),
            Self::Dpll(s) => s.solve(),
        }
    }

    fn model_value(&self, var: Variable) -> VarState {
        match self {
            Self::Cdcl(s) => s.model_value(var),
            Self::Dpll(s) => s.model_value(var),
        }
    }

    fn model(&self) -> Vec<VarState> {
        match self {
            Self::Cdcl(s) => s.model(),
            Self::Dpll(s) => s.model(),
        }
    }

    fn num_vars(&self) -> usize {
        match self {
            Self::Cdcl(s) => s.num_vars(),
            Self::Dpll(s) => s.num_vars(),
        }
    }

    fn num_clauses(&self) -> usize {
        match self {
            Self::Cdcl(s) => s.num_clauses(),
            Self::Dpll(s) => s.num_clauses(),
        }
    }

    fn is_consistent(&self) -> bool {
        match self {
            Self::Cdcl(s) => s.is_consistent(),
            Self::Dpll(s) => s.is_consistent(),
        }
    }

    fn stats(&self) -> SolutionStats {
        match self {
            Self::Cdcl(s) => s.stats(),
            Self::Dpll(s) => s.stats(),
        }
    }

    fn cnf(&self) -> &Cnf {
        match self {
            Self::Cdcl(s) => s.cnf(),
            Self::Dpll(s) => s.cnf(),
        }
    }
}
