#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Graph k-coloring as a SAT problem.
//!
//! Variable `var(n, c) = c * N + n` is true iff node `n` has color `c`. The
//! encoding is
//! - per node, at most one color: `¬var(n,i) ∨ ¬var(n,j)` for every `i < j`;
//! - per node, at least one color: `var(n,0) ∨ ... ∨ var(n,k-1)`;
//! - per edge `(a, b)` and color `c`: `¬var(a,c) ∨ ¬var(b,c)`.
//!
//! Clauses are emitted node by node (a node's own clauses, then the edges it is
//! the smaller endpoint of), and only once per problem: the first query builds the
//! encoding, later queries reuse it.

use crate::coloring::error::{ColoringError, Result};
use crate::coloring::graph::Graph;
use crate::sat::assignment::VarState;
use crate::sat::cdcl::Cdcl;
use crate::sat::literal::{Literal, Variable};
use crate::sat::solver::Solver;
use std::io::Write;
use tracing::{debug, trace};

/// Size of a built encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncodingStats {
    /// Decision variables allocated, `k * N`.
    pub variables: usize,
    /// Clauses emitted by the build.
    pub clauses: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Unbuilt,
    Built(EncodingStats),
}

/// One solution: the truth value of every decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coloring {
    values: Vec<VarState>,
    node_count: usize,
    color_count: usize,
}

impl Coloring {
    /// Truth value of every decision variable, indexed by `var(n, c)`.
    #[must_use]
    pub fn values(&self) -> &[VarState] {
        &self.values
    }

    /// Value of decision variable `var`; unknown for indices past the encoding.
    #[must_use]
    pub fn value(&self, var: Variable) -> VarState {
        self.values.get(var as usize).copied().unwrap_or_default()
    }

    /// The color of `node`, if exactly one of its variables is true.
    #[must_use]
    pub fn color_of(&self, node: usize) -> Option<usize> {
        if node >= self.node_count {
            return None;
        }
        let mut colors = (0..self.color_count)
            .filter(|&c| self.values.get(c * self.node_count + node).is_some_and(|s| s.is_true()));
        match (colors.next(), colors.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// `color_of` for every node, in node order.
    #[must_use]
    pub fn node_colors(&self) -> Vec<Option<usize>> {
        (0..self.node_count).map(|n| self.color_of(n)).collect()
    }

    /// Every node has exactly one color and no edge of `graph` joins two nodes of
    /// the same color.
    #[must_use]
    pub fn is_proper(&self, graph: &Graph) -> bool {
        if graph.node_count() != self.node_count {
            return false;
        }
        let colors = self.node_colors();
        colors.iter().all(Option::is_some) && graph.edges().all(|(a, b)| colors[a] != colors[b])
    }
}

/// A k-coloring query over a borrowed graph, driving a SAT backend it owns.
#[derive(Debug)]
pub struct ColoringProblem<'g, B: Solver = Cdcl> {
    graph: &'g Graph,
    color_count: usize,
    backend: B,
    encoding: Encoding,
}

impl<'g> ColoringProblem<'g> {
    /// A problem backed by the default CDCL solver.
    ///
    /// # Errors
    ///
    /// `ColoringError::InvalidArgument` if `color_count` is 0.
    pub fn new(graph: &'g Graph, color_count: usize) -> Result<Self> {
        Self::with_backend(graph, color_count, Cdcl::default())
    }
}

impl<'g, B: Solver> ColoringProblem<'g, B> {
    /// A problem backed by `backend`, which must not have allocated any variables.
    ///
    /// # Errors
    ///
    /// `ColoringError::InvalidArgument` if `color_count` is 0, if `k * N` does not
    /// fit a `usize`, or if the backend already has variables.
    pub fn with_backend(graph: &'g Graph, color_count: usize, backend: B) -> Result<Self> {
        if color_count < 1 {
            return Err(ColoringError::InvalidArgument(
                "at least one color is required".to_string(),
            ));
        }
        if color_count.checked_mul(graph.node_count()).is_none() {
            return Err(ColoringError::InvalidArgument(format!(
                "{color_count} colors over {} nodes overflow the variable space",
                graph.node_count()
            )));
        }
        if backend.num_vars() != 0 {
            return Err(ColoringError::InvalidArgument(format!(
                "backend already holds {} variables",
                backend.num_vars()
            )));
        }
        Ok(Self {
            graph,
            color_count,
            backend,
            encoding: Encoding::Unbuilt,
        })
    }

    /// The graph being colored.
    #[must_use]
    pub const fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Number of colors `k`.
    #[must_use]
    pub const fn color_count(&self) -> usize {
        self.color_count
    }

    /// The backend, with every clause added so far.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Releases the backend, with whatever clauses the queries left in it.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Variables and clauses emitted by the build; `None` until the first query.
    #[must_use]
    pub const fn encoding_stats(&self) -> Option<EncodingStats> {
        match self.encoding {
            Encoding::Unbuilt => None,
            Encoding::Built(stats) => Some(stats),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn var(&self, node: usize, color: usize) -> Variable {
        (color * self.graph.node_count() + node) as Variable
    }

    /// The decision variable meaning "`node` has `color`".
    ///
    /// # Errors
    ///
    /// `ColoringError::InvalidArgument` if `node` or `color` is out of range.
    pub fn variable(&self, node: usize, color: usize) -> Result<Variable> {
        if node >= self.graph.node_count() {
            return Err(ColoringError::InvalidArgument(format!(
                "node {node} out of range for a graph of {} nodes",
                self.graph.node_count()
            )));
        }
        if color >= self.color_count {
            return Err(ColoringError::InvalidArgument(format!(
                "color {color} out of range for {} colors",
                self.color_count
            )));
        }
        Ok(self.var(node, color))
    }

    fn allocate_variables(&mut self) -> Result<usize> {
        let nodes = self.graph.node_count();
        for color in 0..self.color_count {
            for node in 0..nodes {
                let expected = self.var(node, color);
                let var = self.backend.new_var()?;
                if var != expected {
                    return Err(ColoringError::InvalidArgument(format!(
                        "backend allocated variable {var} where {expected} was expected"
                    )));
                }
            }
        }
        Ok(self.color_count * nodes)
    }

    fn add_one_color_constraints(&mut self, node: usize) -> Result<()> {
        for i in 0..self.color_count {
            for j in (i + 1)..self.color_count {
                let clause = [
                    Literal::negative(self.var(node, i)),
                    Literal::negative(self.var(node, j)),
                ];
                self.backend.add_clause(&clause)?;
            }
        }

        let at_least_one: Vec<Literal> = (0..self.color_count)
            .map(|c| Literal::positive(self.var(node, c)))
            .collect();
        self.backend.add_clause(&at_least_one)?;
        Ok(())
    }

    fn add_edge_constraints(&mut self, a: usize, b: usize) -> Result<()> {
        for c in 0..self.color_count {
            let clause = [
                Literal::negative(self.var(a, c)),
                Literal::negative(self.var(b, c)),
            ];
            self.backend.add_clause(&clause)?;
        }
        Ok(())
    }

    /// Emits the encoding into the backend, once.
    ///
    /// A build interrupted by backend exhaustion leaves its variables behind, so a
    /// retry is refused rather than allocating a second, misnumbered set.
    fn build_encoding(&mut self) -> Result<EncodingStats> {
        if let Encoding::Built(stats) = self.encoding {
            return Ok(stats);
        }
        if self.backend.num_vars() != 0 {
            return Err(ColoringError::InvalidArgument(
                "an earlier encoding build was interrupted; the backend is no longer fresh"
                    .to_string(),
            ));
        }

        let clauses_before = self.backend.num_clauses();
        let variables = self.allocate_variables()?;

        let graph = self.graph;
        for node in 0..graph.node_count() {
            self.add_one_color_constraints(node)?;
            for &other in graph.edges_of(node)? {
                self.add_edge_constraints(node, other)?;
            }
        }

        let stats = EncodingStats {
            variables,
            clauses: self.backend.num_clauses() - clauses_before,
        };
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            colors = self.color_count,
            variables = stats.variables,
            clauses = stats.clauses,
            "built coloring encoding"
        );
        self.encoding = Encoding::Built(stats);
        Ok(stats)
    }

    /// Whether the graph has a proper coloring with `color_count` colors.
    ///
    /// # Errors
    ///
    /// `ColoringError::BackendExhausted` if the backend cannot hold the encoding.
    pub fn is_colorable(&mut self) -> Result<bool> {
        self.build_encoding()?;
        Ok(self.backend.solve().is_sat())
    }

    /// Pins `node` to `color` by asserting `var(node, color)` as a unit clause.
    /// Every later query only sees colorings that agree with it.
    ///
    /// # Errors
    ///
    /// `ColoringError::InvalidArgument` if `node` or `color` is out of range, and
    /// `ColoringError::BackendExhausted` if the backend cannot hold the encoding or
    /// the unit clause.
    pub fn fix_color(&mut self, node: usize, color: usize) -> Result<()> {
        let var = self.variable(node, color)?;
        self.build_encoding()?;
        self.backend.add_clause(&[Literal::positive(var)])?;
        trace!(node, color, "fixed color");
        Ok(())
    }

    /// One proper coloring, if there is any.
    ///
    /// # Errors
    ///
    /// `ColoringError::BackendExhausted` if the backend cannot hold the encoding.
    pub fn find_coloring(&mut self) -> Result<Option<Coloring>> {
        let stats = self.build_encoding()?;
        if self.backend.solve().is_sat() {
            Ok(Some(self.model_coloring(stats)))
        } else {
            Ok(None)
        }
    }

    /// The decision variables of the backend's current model.
    fn model_coloring(&self, stats: EncodingStats) -> Coloring {
        Coloring {
            values: (0..stats.variables)
                .map(|v| self.backend.model_value(v as Variable))
                .collect(),
            node_count: self.graph.node_count(),
            color_count: self.color_count,
        }
    }

    /// Every proper coloring, each exactly once.
    ///
    /// Each model found is excluded by a blocking clause over all decision
    /// variables before solving again, so the backend grows by one clause per
    /// solution.
    ///
    /// # Errors
    ///
    /// `ColoringError::BackendExhausted` if the backend cannot hold the encoding or
    /// a blocking clause.
    pub fn all_colorings(&mut self) -> Result<Vec<Coloring>> {
        let stats = self.build_encoding()?;
        let mut solutions = Vec::new();

        while self.backend.solve().is_sat() {
            let coloring = self.model_coloring(stats);
            let blocking: Vec<Literal> = coloring
                .values
                .iter()
                .enumerate()
                .map(|(v, state)| Literal::new(v as Variable, !state.is_true()))
                .collect();

            trace!(solution = solutions.len(), "blocking model");
            solutions.push(coloring);
            self.backend.add_clause(&blocking)?;
        }

        debug!(solutions = solutions.len(), "enumeration finished");
        Ok(solutions)
    }

    /// Writes the encoding, plus any clauses queries have added since, as DIMACS
    /// CNF.
    ///
    /// # Errors
    ///
    /// `ColoringError::BackendExhausted` if the encoding cannot be built, and
    /// `ColoringError::Io` if writing fails.
    pub fn export_dimacs<W: Write>(&mut self, writer: W) -> Result<()> {
        self.build_encoding()?;
        self.backend.write_dimacs(writer)?;
        Ok(())
    }
}
