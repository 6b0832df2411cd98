#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader for DIMACS graph files, as used by the graph coloring benchmarks.
//!
//! - Comment lines start with `c`.
//! - The problem line `p edge <nodes> <edges>` (`p col` is accepted too) must come
//!   before any edge.
//! - Edge lines `e <u> <v>` use 1-based node numbers.
//!
//! Edges are oriented smaller endpoint first before they reach [`Graph::add_edge`].
//! Self loops and duplicate edges are kept as written.

use crate::coloring::error::ColoringError;
use crate::coloring::graph::Graph;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::io::{self, BufRead};
use std::path::Path;
use tracing::debug;

/// Errors raised while reading a DIMACS graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphParseError {
    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// A `p` line that is not `p edge <nodes> <edges>`.
    #[error("line {line}: malformed problem line `{text}`")]
    InvalidProblemLine {
        /// 1-based line number.
        line: usize,
        /// The whole line.
        text: String,
    },

    /// An edge line before any problem line.
    #[error("line {line}: edge before the problem line")]
    MissingProblemLine {
        /// 1-based line number.
        line: usize,
    },

    /// An `e` line without two node numbers.
    #[error("line {line}: malformed edge `{text}`")]
    InvalidEdge {
        /// 1-based line number.
        line: usize,
        /// The whole line.
        text: String,
    },

    /// An edge endpoint outside the declared node range.
    #[error("line {line}: node {node} outside 1..={node_count}")]
    NodeOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The endpoint as written (1-based).
        node: usize,
        /// Nodes declared by the problem line.
        node_count: usize,
    },

    /// A line that is neither comment, problem line nor edge.
    #[error("line {line}: unexpected line `{text}`")]
    UnexpectedLine {
        /// 1-based line number.
        line: usize,
        /// The whole line.
        text: String,
    },

    /// The input has no problem line.
    #[error("no problem line found")]
    Empty,

    /// The graph rejected an edge.
    #[error(transparent)]
    Graph(#[from] ColoringError),
}

fn parse_problem_line(line: usize, text: &str) -> Result<usize, GraphParseError> {
    let invalid = || GraphParseError::InvalidProblemLine {
        line,
        text: text.to_string(),
    };
    match text.split_whitespace().collect_vec().as_slice() {
        ["p", "edge" | "col", nodes, edges] => {
            edges.parse::<usize>().map_err(|_| invalid())?;
            nodes.parse::<usize>().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

fn parse_edge_line(line: usize, text: &str) -> Result<(usize, usize), GraphParseError> {
    let invalid = || GraphParseError::InvalidEdge {
        line,
        text: text.to_string(),
    };
    match text.split_whitespace().collect_vec().as_slice() {
        ["e", u, v] => {
            let u = u.parse::<usize>().map_err(|_| invalid())?;
            let v = v.parse::<usize>().map_err(|_| invalid())?;
            Ok((u, v))
        }
        _ => Err(invalid()),
    }
}

/// Parses a DIMACS graph from `reader`.
///
/// # Errors
///
/// `GraphParseError` for I/O failures, malformed lines, edges before the problem
/// line, node numbers outside `1..=N`, or input without a problem line.
pub fn parse_col<R: BufRead>(reader: R) -> Result<Graph, GraphParseError> {
    let mut graph: Option<Graph> = None;
    let mut seen = FxHashSet::default();
    let mut duplicates = 0_usize;
    let mut self_loops = 0_usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let text = line.trim();

        match text.chars().next() {
            None | Some('c') => {}
            Some('p') => {
                let nodes = parse_problem_line(line_no, text)?;
                graph = Some(Graph::new(nodes));
            }
            Some('e') => {
                let g = graph
                    .as_mut()
                    .ok_or(GraphParseError::MissingProblemLine { line: line_no })?;
                let (u, v) = parse_edge_line(line_no, text)?;
                for node in [u, v] {
                    if node == 0 || node > g.node_count() {
                        return Err(GraphParseError::NodeOutOfRange {
                            line: line_no,
                            node,
                            node_count: g.node_count(),
                        });
                    }
                }
                let (a, b) = (u.min(v) - 1, u.max(v) - 1);
                if a == b {
                    self_loops += 1;
                }
                if !seen.insert((a, b)) {
                    duplicates += 1;
                }
                g.add_edge(a, b)?;
            }
            Some(_) => {
                return Err(GraphParseError::UnexpectedLine {
                    line: line_no,
                    text: text.to_string(),
                });
            }
        }
    }

    let graph = graph.ok_or(GraphParseError::Empty)?;
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        duplicates,
        self_loops,
        "parsed graph"
    );
    Ok(graph)
}

/// Parses the DIMACS graph file at `path`.
///
/// # Errors
///
/// `GraphParseError::Io` if the file cannot be opened, and anything
/// [`parse_col`] reports.
pub fn parse_col_file<P: AsRef<Path>>(path: P) -> Result<Graph, GraphParseError> {
    let file = std::fs::File::open(path)?;
    parse_col(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Graph, GraphParseError> {
        parse_col(text.as_bytes())
    }

    #[test]
    fn test_parse_orients_edges() {
        let g = parse("c triangle\np edge 3 3\ne 1 2\ne 3 2\ne 3 1\n").unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_duplicates_and_loops_kept() {
        let g = parse("p col 2 3\ne 1 2\ne 2 1\ne 2 2\n").unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges_of(1).unwrap(), &[1]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("e 1 2\n"),
            Err(GraphParseError::MissingProblemLine { line: 1 })
        ));
        assert!(matches!(
            parse("p edge 2 1\ne 1 3\n"),
            Err(GraphParseError::NodeOutOfRange { node: 3, .. })
        ));
        assert!(matches!(
            parse("p edge 2 1\ne 0 1\n"),
            Err(GraphParseError::NodeOutOfRange { node: 0, .. })
        ));
        assert!(matches!(
            parse("p edge 2 1\ne 1\n"),
            Err(GraphParseError::InvalidEdge { line: 2, .. })
        ));
        assert!(matches!(
            parse("p graph 2 1\n"),
            Err(GraphParseError::InvalidProblemLine { .. })
        ));
        assert!(matches!(parse("c nothing\n"), Err(GraphParseError::Empty)));
        assert!(matches!(
            parse("p edge 2 0\nx 1 2\n"),
            Err(GraphParseError::UnexpectedLine { line: 2, .. })
        ));
    }
}
