#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A Sudoku of side `n = b * b` is the graph on its `n * n` cells with an edge
//! between any two cells that share a row, a column or a `b * b` box. A solution
//! is a proper `n`-coloring of that graph, color `c` standing for digit `c + 1`.
//! Each given clue pins its cell to one color.
//!
//! Puzzle files hold one row per line. Cells are either whitespace separated
//! numbers, or single characters when the row has no whitespace. `0`, `.` and `_`
//! mark an empty cell. Blank lines, lines starting with `c` or `#`, `|` box
//! separators and `-`/`+` rule lines are ignored, so printed puzzles read back.

use crate::coloring::{Coloring, ColoringError, ColoringProblem, Graph};
use crate::sat::cdcl::Cdcl;
use crate::sat::solver::Solver;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Errors raised while reading or solving a puzzle.
#[derive(Debug, thiserror::Error)]
pub enum SudokuError {
    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// A cell that is neither a number nor an empty-cell marker.
    #[error("line {line}: invalid cell `{token}`")]
    InvalidCell {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// The grid is not square, or its side is not a square number.
    #[error("a {rows}-row grid is not a Sudoku; the side must be a square number")]
    InvalidSize {
        /// Rows found.
        rows: usize,
    },

    /// A row with the wrong number of cells.
    #[error("row {row}: expected {expected} cells, found {found}")]
    RowLength {
        /// 1-based row number.
        row: usize,
        /// The side of the grid.
        expected: usize,
        /// Cells found in the row.
        found: usize,
    },

    /// A clue larger than the side of the grid.
    #[error("row {row}, column {col}: value {value} outside 1..={size}")]
    ValueOutOfRange {
        /// 1-based row number.
        row: usize,
        /// 1-based column number.
        col: usize,
        /// The clue as written.
        value: usize,
        /// The side of the grid.
        size: usize,
    },

    /// Building or querying the coloring problem failed.
    #[error(transparent)]
    Coloring(#[from] ColoringError),
}

/// A square grid of side `block_size²`. Empty cells hold `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    cells: Vec<usize>,
    size: usize,
    block_size: usize,
}

/// The classic 9×9 example puzzle.
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

impl Sudoku {
    /// A puzzle from its rows.
    ///
    /// # Errors
    ///
    /// `SudokuError::InvalidSize` unless there are `b * b` rows for some `b ≥ 1`,
    /// `SudokuError::RowLength` for a row of the wrong length, and
    /// `SudokuError::ValueOutOfRange` for a clue above the side.
    pub fn new(rows: Vec<Vec<usize>>) -> Result<Self, SudokuError> {
        let size = rows.len();
        let block_size = size.isqrt();
        if size == 0 || block_size * block_size != size {
            return Err(SudokuError::InvalidSize { rows: size });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(SudokuError::RowLength {
                    row: r + 1,
                    expected: size,
                    found: row.len(),
                });
            }
            if let Some((c, &value)) = row.iter().find_position(|&&v| v > size) {
                return Err(SudokuError::ValueOutOfRange {
                    row: r + 1,
                    col: c + 1,
                    value,
                    size,
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            cells,
            size,
            block_size,
        })
    }

    /// Side of the grid, which is also the number of digits.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Side of one box.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// The digit in a cell, `None` if it is empty.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is not below [`Sudoku::size`].
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        assert!(row < self.size && col < self.size, "cell out of range");
        Some(self.cells[row * self.size + col]).filter(|&v| v != 0)
    }

    /// Number of given clues.
    #[must_use]
    pub fn clue_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Rows as vectors of digits, `0` for empty cells.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<usize>> {
        self.cells.chunks(self.size).map(<[usize]>::to_vec).collect()
    }

    fn shares_unit(&self, a: usize, b: usize) -> bool {
        let (ra, ca) = (a / self.size, a % self.size);
        let (rb, cb) = (b / self.size, b % self.size);
        ra == rb
            || ca == cb
            || (ra / self.block_size == rb / self.block_size
                && ca / self.block_size == cb / self.block_size)
    }

    /// The constraint graph: one node per cell in row-major order, and an edge
    /// between every two cells that may not hold the same digit.
    ///
    /// # Errors
    ///
    /// Only what [`Graph::add_edge`] reports, which cannot happen for pairs taken
    /// in increasing order.
    pub fn graph(&self) -> Result<Graph, SudokuError> {
        let cells = self.size * self.size;
        let mut graph = Graph::new(cells);
        for (a, b) in (0..cells).tuple_combinations::<(usize, usize)>() {
            if self.shares_unit(a, b) {
                graph.add_edge(a, b)?;
            }
        }
        debug!(
            size = self.size,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built sudoku graph"
        );
        Ok(graph)
    }

    /// A `size`-coloring problem over `graph` (as returned by [`Sudoku::graph`])
    /// with every clue fixed.
    ///
    /// # Errors
    ///
    /// Whatever [`ColoringProblem::with_backend`] or
    /// [`ColoringProblem::fix_color`] report.
    pub fn problem<'g, B: Solver>(
        &self,
        graph: &'g Graph,
        backend: B,
    ) -> Result<ColoringProblem<'g, B>, SudokuError> {
        let mut problem = ColoringProblem::with_backend(graph, self.size, backend)?;
        for (cell, &value) in self.cells.iter().enumerate() {
            if value != 0 {
                problem.fix_color(cell, value - 1)?;
            }
        }
        Ok(problem)
    }

    /// Reads a coloring of the puzzle's graph back into a grid. `None` if some cell
    /// has no single color.
    #[must_use]
    pub fn decode(&self, coloring: &Coloring) -> Option<Self> {
        let cells = coloring
            .node_colors()
            .into_iter()
            .map(|color| color.map(|c| c + 1))
            .collect::<Option<Vec<_>>>()?;
        (cells.len() == self.cells.len()).then(|| Self {
            cells,
            size: self.size,
            block_size: self.block_size,
        })
    }

    /// Solves the puzzle with the default CDCL backend.
    ///
    /// # Errors
    ///
    /// See [`Sudoku::solve_with`].
    pub fn solve(&self) -> Result<Option<Self>, SudokuError> {
        self.solve_with(Cdcl::default())
    }

    /// Solves the puzzle with `backend`. `Ok(None)` if the clues admit no
    /// solution.
    ///
    /// # Errors
    ///
    /// `SudokuError::Coloring` if the backend cannot hold the encoding.
    pub fn solve_with<B: Solver>(&self, backend: B) -> Result<Option<Self>, SudokuError> {
        let graph = self.graph()?;
        let mut problem = self.problem(&graph, backend)?;
        let solution = problem
            .find_coloring()?
            .and_then(|coloring| self.decode(&coloring));
        debug!(
            clues = self.clue_count(),
            solved = solution.is_some(),
            "sudoku solve finished"
        );
        Ok(solution)
    }

    /// `true` if `self` is completely filled, breaks no row, column or box rule,
    /// and keeps every clue of `puzzle`.
    #[must_use]
    pub fn is_solution_of(&self, puzzle: &Self) -> bool {
        let cells = self.cells.len();
        self.size == puzzle.size
            && self.cells.iter().all(|&v| (1..=self.size).contains(&v))
            && self
                .cells
                .iter()
                .zip(&puzzle.cells)
                .all(|(&v, &clue)| clue == 0 || v == clue)
            && (0..cells)
                .tuple_combinations::<(usize, usize)>()
                .all(|(a, b)| !self.shares_unit(a, b) || self.cells[a] != self.cells[b])
    }
}

impl TryFrom<[[usize; 9]; 9]> for Sudoku {
    type Error = SudokuError;

    fn try_from(rows: [[usize; 9]; 9]) -> Result<Self, Self::Error> {
        Self::new(rows.iter().map(|row| row.to_vec()).collect())
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self.size.to_string().len();
        let rule = (0..self.block_size)
            .map(|_| "-".repeat(self.block_size * (width + 1) - 1))
            .join("-+-");

        for (r, row) in self.cells.chunks(self.size).enumerate() {
            if r > 0 && r % self.block_size == 0 {
                writeln!(f, "{rule}")?;
            }
            let line = row
                .iter()
                .enumerate()
                .map(|(c, &v)| {
                    let cell = if v == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{v:>width$}")
                    };
                    if c > 0 && c % self.block_size == 0 {
                        format!("| {cell}")
                    } else {
                        cell
                    }
                })
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn parse_cell(token: &str) -> Option<usize> {
    match token {
        "." | "_" => Some(0),
        _ => token.parse().ok(),
    }
}

fn is_ignored(text: &str) -> bool {
    text.is_empty()
        || text.starts_with('c')
        || text.starts_with('#')
        || text.chars().all(|ch| matches!(ch, '-' | '+' | ' '))
}

/// Reads a puzzle.
///
/// # Errors
///
/// `SudokuError::Io` if reading fails, `SudokuError::InvalidCell` for a token
/// that is not a cell, and whatever [`Sudoku::new`] reports for the grid.
pub fn parse_sudoku<R: BufRead>(reader: R) -> Result<Sudoku, SudokuError> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if is_ignored(text) {
            continue;
        }

        let tokens = if text.contains(char::is_whitespace) {
            text.split_whitespace().filter(|&t| t != "|").collect_vec()
        } else {
            text.char_indices()
                .filter(|&(_, ch)| ch != '|')
                .map(|(i, ch)| &text[i..i + ch.len_utf8()])
                .collect_vec()
        };

        let row = tokens
            .into_iter()
            .map(|token| {
                parse_cell(token).ok_or_else(|| SudokuError::InvalidCell {
                    line: idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Sudoku::new(rows)
}

/// Reads a puzzle file.
///
/// # Errors
///
/// See [`parse_sudoku`].
pub fn parse_sudoku_file<P: AsRef<Path>>(path: P) -> Result<Sudoku, SudokuError> {
    let file = File::open(path)?;
    parse_sudoku(BufReader::new(file))
}
