#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Undirected graphs with a canonical edge orientation.
//!
//! Each edge `{a, b}` is stored once, under its smaller endpoint. `add_edge`
//! rejects edges given larger endpoint first instead of flipping them, so callers
//! (and the encoder) can rely on every edge showing up exactly once.

use crate::coloring::error::{ColoringError, Result};
use smallvec::SmallVec;

/// Out-going neighbours of one node. Most benchmark graphs are sparse.
pub type Neighbours = SmallVec<[usize; 4]>;

/// An undirected graph over nodes `0..node_count`, edges stored under their
/// smaller endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Graph {
    node_count: usize,
    adjacency: Vec<Neighbours>,
}

impl Graph {
    /// A graph with `node_count` nodes and no edges. A negative count cannot be
    /// expressed with `usize`.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            adjacency: vec![Neighbours::new(); node_count],
        }
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node >= self.node_count {
            return Err(ColoringError::InvalidArgument(format!(
                "node {node} out of range for a graph of {} nodes",
                self.node_count
            )));
        }
        Ok(())
    }

    /// Records the edge `(a, b)`. Duplicate edges are kept.
    ///
    /// # Errors
    ///
    /// `ColoringError::InvalidArgument` if either endpoint is out of range, and
    /// `ColoringError::InvalidOrientation` if `a > b`. The graph is unchanged on
    /// error.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a > b {
            return Err(ColoringError::InvalidOrientation { from: a, to: b });
        }
        self.adjacency[a].push(b);
        Ok(())
    }

    /// Nodes that `node` connects to as the smaller endpoint, in insertion order.
    ///
    /// # Errors
    ///
    /// `ColoringError::InvalidArgument` if `node` is out of range.
    pub fn edges_of(&self, node: usize) -> Result<&[usize]> {
        self.check_node(node)?;
        Ok(self.adjacency[node].as_slice())
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(SmallVec::len).sum()
    }

    /// Every edge as `(smaller, larger)`, grouped by smaller endpoint.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, out)| out.iter().map(move |&b| (a, b)))
    }

    /// Complete graph on `n` nodes.
    #[must_use]
    pub fn complete(n: usize) -> Self {
        let mut graph = Self::new(n);
        for a in 0..n {
            graph.adjacency[a].extend(a + 1..n);
        }
        graph
    }

    /// Cycle `0 - 1 - ... - (n-1) - 0`. Fewer than three nodes give a path.
    #[must_use]
    pub fn cycle(n: usize) -> Self {
        let mut graph = Self::new(n);
        for a in 1..n {
            graph.adjacency[a - 1].push(a);
        }
        if n > 2 {
            graph.adjacency[0].push(n - 1);
        }
        graph
    }
}
