//! # sat-coloring
//!
//! Command-line front-end for deciding and enumerating graph k-colorings by
//! reduction to SAT.
//!
//! Graphs are read in the DIMACS graph format used by the coloring benchmarks:
//!
//! ```text
//! c a triangle
//! p edge 3 3
//! e 1 2
//! e 2 3
//! e 1 3
//! ```
//!
//! ## Subcommands
//!
//! 1.  **`check`**: decide whether the graph is k-colorable.
//!     ```sh
//!     sat-coloring check --path triangle.col -k 3
//!     ```
//!
//! 2.  **`enumerate`**: find every proper k-coloring. `--limit` caps how many are
//!     printed, not how many are found.
//!     ```sh
//!     sat-coloring enumerate --path triangle.col -k 3 --limit 10
//!     ```
//!
//! 3.  **`export`**: write the coloring encoding as DIMACS CNF.
//!     ```sh
//!     sat-coloring export --path triangle.col -k 3 --output triangle.cnf
//!     ```
//!
//! 4.  **`file`**: solve an arbitrary DIMACS CNF file.
//!     ```sh
//!     sat-coloring file --path problem.cnf --backend dpll --print-solution
//!     ```
//!
//! 5.  **`sudoku`**: solve a Sudoku puzzle as a coloring of its cell graph and
//!     print the filled grid. `--export-dimacs` also writes the encoding.
//!     ```sh
//!     sat-coloring sudoku --path puzzle.sudoku --verify
//!     ```
//!
//! 6.  **`completions`**: print shell completions.
//!
//! ## Common Options
//!
//! -   `-k, --colors <K>`: number of colors (default: `3`).
//! -   `--backend <cdcl|dpll>`: SAT backend (default: `cdcl`). `dpll` has no
//!     learning and is meant as a reference on small inputs.
//! -   `--variable-selection <vsids|fixed|random>` and
//!     `--restart-strategy <luby|geometric|linear|never>`: CDCL heuristics.
//! -   `--max-variables <N>`, `--max-clauses <N>`: backend resource limits.
//! -   `-s, --stats`: print problem and search statistics, including jemalloc
//!     memory usage.
//! -   `-v, --verify`: check every solution found.
//! -   `-d, --debug`: debug logging. `RUST_LOG` takes precedence when set.

use clap::Parser;
use command_line::cli::Cli;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// statistics.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = command_line::cli::run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
