#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching heuristics: which unassigned variable to decide next.

use crate::sat::assignment::VecAssignment;
use crate::sat::literal::Variable;
use clap::ValueEnum;
use ordered_float::OrderedFloat;
use std::fmt::Debug;

/// A branching heuristic of the CDCL backend.
pub trait VariableSelection: Debug + Clone {
    /// A heuristic over `num_vars` variables.
    fn new(num_vars: usize) -> Self;

    /// Makes room for a freshly allocated variable.
    fn add_variable(&mut self);

    /// The next variable to decide, or `None` once every variable is assigned.
    fn pick(&mut self, assignment: &VecAssignment) -> Option<Variable>;

    /// Rewards variables that took part in a conflict.
    fn bumps<T: IntoIterator<Item = Variable>>(&mut self, vars: T);

    /// Called once per conflict, after bumping.
    fn decay(&mut self);
}

const DEFAULT_DECAY: f64 = 0.95;
const RESCALE_THRESHOLD: f64 = 1e100;

/// Variable State Independent Decaying Sum. Activities are bumped by a growing
/// increment instead of decaying every score, and rescaled before they overflow.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct Vsids {
    activity: Vec<f64>,
    increment: f64,
    decay: f64,
}

impl Vsids {
    /// Adds the current increment to the activity of `var`.
    pub fn bump(&mut self, var: Variable) {
        let score = &mut self.activity[var as usize];
        *score += self.increment;
        if *score > RESCALE_THRESHOLD {
            self.activity
                .iter_mut()
                .for_each(|a| *a /= RESCALE_THRESHOLD);
            self.increment /= RESCALE_THRESHOLD;
        }
    }

    /// Current activity score of `var`.
    #[must_use]
    pub fn activity(&self, var: Variable) -> f64 {
        self.activity[var as usize]
    }
}

impl VariableSelection for Vsids {
    fn new(num_vars: usize) -> Self {
        Self {
            activity: vec![0.0; num_vars],
            increment: 1.0,
            decay: DEFAULT_DECAY,
        }
    }

    fn add_variable(&mut self) {
        self.activity.push(0.0);
    }

    /// Highest activity wins; ties go to the lowest index.
    fn pick(&mut self, assignment: &VecAssignment) -> Option<Variable> {
        assignment
            .unassigned()
            .rev()
            .max_by_key(|&v| OrderedFloat(self.activity[v as usize]))
    }

    fn bumps<T: IntoIterator<Item = Variable>>(&mut self, vars: T) {
        for var in vars {
            self.bump(var);
        }
    }

    fn decay(&mut self) {
        self.increment /= self.decay;
    }
}

/// Always the lowest-indexed unassigned variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn new(_: usize) -> Self {
        Self
    }

    fn add_variable(&mut self) {}

    fn pick(&mut self, assignment: &VecAssignment) -> Option<Variable> {
        assignment.unassigned().next()
    }

    fn bumps<T: IntoIterator<Item = Variable>>(&mut self, _: T) {}

    fn decay(&mut self) {}
}

const RANDOM_ORDER_SEED: u64 = 0x5eed_c010;

/// Uniformly random unassigned variable, from a fixed seed so runs are repeatable.
#[derive(Debug, Clone)]
pub struct RandomOrder(fastrand::Rng);

impl VariableSelection for RandomOrder {
    fn new(_: usize) -> Self {
        Self(fastrand::Rng::with_seed(RANDOM_ORDER_SEED))
    }

    fn add_variable(&mut self) {}

    fn pick(&mut self, assignment: &VecAssignment) -> Option<Variable> {
        let unassigned: Vec<Variable> = assignment.unassigned().collect();
        if unassigned.is_empty() {
            return None;
        }
        Some(unassigned[self.0.usize(..unassigned.len())])
    }

    fn bumps<T: IntoIterator<Item = Variable>>(&mut self, _: T) {}

    fn decay(&mut self) {}
}

/// Run-time choice between the heuristics above.
#[derive(Debug, Clone)]
pub enum VariableSelectionImpls {
    /// Activity-based selection.
    Vsids(Vsids),
    /// Lowest index first.
    FixedOrder(FixedOrder),
    /// Seeded random order.
    RandomOrder(RandomOrder),
}

impl VariableSelection for VariableSelectionImpls {
    fn new(num_vars: usize) -> Self {
        Self::Vsids(Vsids::new(num_vars))
    }

    fn add_variable(&mut self) {
        match self {
            Self::Vsids(s) => s.add_variable(),
            Self::FixedOrder(s) => s.add_variable(),
            Self::RandomOrder(s) => s.add_variable(),
        }
    }

    fn pick(&mut self, assignment: &VecAssignment) -> Option<Variable> {
        match self {
            Self::Vsids(s) => s.pick(assignment),
            Self::FixedOrder(s) => s.pick(assignment),
            Self::RandomOrder(s) => s.pick(assignment),
        }
    }

    fn bumps<T: IntoIterator<Item = Variable>>(&mut self, vars: T) {
        match self {
            Self::Vsids(s) => s.bumps(vars),
            Self::FixedOrder(s) => s.bumps(vars),
            Self::RandomOrder(s) => s.bumps(vars),
        }
    }

    fn decay(&mut self) {
        match self {
            Self::Vsids(s) => s.decay(),
            Self::FixedOrder(s) => s.decay(),
            Self::RandomOrder(s) => s.decay(),
        }
    }
}

/// Names of the branching heuristics, as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum VariableSelectionType {
    /// Activity-based selection (VSIDS).
    #[default]
    Vsids,
    /// Lowest-indexed unassigned variable first.
    Fixed,
    /// Seeded random unassigned variable.
    Random,
}

impl VariableSelectionType {
    /// The heuristic named by `self`, sized for `num_vars` variables.
    #[must_use]
    pub fn to_impl(self, num_vars: usize) -> VariableSelectionImpls {
        match self {
            Self::Vsids => VariableSelectionImpls::Vsids(Vsids::new(num_vars)),
            Self::Fixed => VariableSelectionImpls::FixedOrder(FixedOrder::new(num_vars)),
            Self::Random => VariableSelectionImpls::RandomOrder(RandomOrder::new(num_vars)),
        }
    }
}
