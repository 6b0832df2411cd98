#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
//! Graph k-coloring by reduction to SAT.
//!
//! [`coloring`] turns a graph and a color count into CNF and answers the decision
//! and enumeration queries; [`sat`] holds the SAT backends it drives (an
//! incremental CDCL solver and a DPLL reference solver) behind the
//! [`sat::solver::Solver`] trait, plus DIMACS input and output. [`sudoku`] solves
//! Sudoku puzzles as colorings of their cell graphs.
//!
//! ```
//! use sat_coloring::coloring::{ColoringProblem, Graph};
//!
//! let mut triangle = Graph::new(3);
//! triangle.add_edge(0, 1).unwrap();
//! triangle.add_edge(1, 2).unwrap();
//! triangle.add_edge(0, 2).unwrap();
//!
//! let mut problem = ColoringProblem::new(&triangle, 3).unwrap();
//! assert_eq!(problem.all_colorings().unwrap().len(), 6);
//! ```

/// Graphs, the coloring encoding and its queries.
pub mod coloring;

/// SAT backends and the CNF data they work on.
pub mod sat;

/// Sudoku puzzles encoded as colorings of their cell graphs.
pub mod sudoku;
