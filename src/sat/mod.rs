#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
/// Variable states and the search-time assignment.
pub mod assignment;
/// The incremental CDCL backend.
pub mod cdcl;
/// Clauses as literal lists.
pub mod clause;
/// The problem formula as added by the caller.
pub mod cnf;
/// Run-time backend and heuristic selection.
pub mod configs;
/// First-UIP conflict analysis.
pub mod conflict_analysis;
/// DIMACS CNF input and output.
pub mod dimacs;
/// The DPLL reference backend.
pub mod dpll;
/// Variables and packed literals.
pub mod literal;
/// Saved phases for decisions.
pub mod phase_saving;
/// Restart schedules.
pub mod restarter;
/// The backend capability: the `Solver` trait, limits, statistics and errors.
pub mod solver;
/// The assignment trail and decision levels.
pub mod trail;
/// Branching heuristics.
pub mod variable_selection;
/// Two-watched-literal index.
pub mod watch;
