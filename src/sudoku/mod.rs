#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku puzzles, solved as graph coloring.

/// Puzzle representation, reader and the coloring-based solver.
pub mod solver;

pub use solver::{Sudoku, SudokuError, parse_sudoku, parse_sudoku_file};
