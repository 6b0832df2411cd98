#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
/// DIMACS graph-format reader.
pub mod col;
/// Error type of the coloring layer.
pub mod error;
/// Graphs with canonical edge orientation.
pub mod graph;
/// The coloring encoding and its queries.
pub mod problem;

pub use error::{ColoringError, Result};
pub use graph::Graph;
pub use problem::{Coloring, ColoringProblem, EncodingStats};
