#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use sat_coloring::coloring::col::{GraphParseError, parse_col_file};
use sat_coloring::coloring::{Coloring, ColoringError, ColoringProblem, Graph};
use sat_coloring::sat::configs::{BackendConfig, BackendImpls, BackendType};
use sat_coloring::sat::dimacs::{DimacsError, parse_file};
use sat_coloring::sat::restarter::RestarterType;
use sat_coloring::sat::solver::{BackendError, BackendLimits, SolutionStats, Solver};
use sat_coloring::sat::variable_selection::VariableSelectionType;
use sat_coloring::sudoku::{SudokuError, parse_sudoku_file};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Defines the command-line interface for the graph coloring application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sat-coloring",
    version,
    about = "Graph k-coloring by reduction to SAT"
)]
pub(crate) struct Cli {
    /// Specifies the subcommand to execute (e.g. `check`, `enumerate`, `export`).
    #[clap(subcommand)]
    pub command: Commands,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Decide whether a DIMACS graph is k-colorable.
    Check {
        /// Path to the DIMACS graph (`p edge N M`, `e u v`).
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Find every proper k-coloring of a DIMACS graph.
    Enumerate {
        /// Path to the DIMACS graph.
        #[arg(long)]
        path: PathBuf,

        /// Print at most this many colorings. All of them are still found and counted.
        #[arg(long)]
        limit: Option<usize>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Write the k-coloring encoding of a DIMACS graph as DIMACS CNF.
    Export {
        /// Path to the DIMACS graph.
        #[arg(long)]
        path: PathBuf,

        /// Destination file. Standard output when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF file in DIMACS format with the configured backend.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a Sudoku puzzle as a coloring of its cell graph.
    ///
    /// The number of colors is the side of the grid; `-k` is ignored.
    Sudoku {
        /// Path to the puzzle: one row per line, `0` or `.` for empty cells.
        #[arg(long)]
        path: PathBuf,

        /// Also write the encoding, clues included, as DIMACS CNF to `<path>.cnf`.
        #[arg(short, long, default_value_t = false)]
        export_dimacs: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    const fn common(&self) -> Option<&CommonOptions> {
        match self {
            Self::Check { common, .. }
            | Self::Enumerate { common, .. }
            | Self::Export { common, .. }
            | Self::File { common, .. }
            | Self::Sudoku { common, .. } => Some(common),
            Self::Completions { .. } => None,
        }
    }
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Number of colors available.
    #[arg(short = 'k', long, default_value_t = 3)]
    pub(crate) colors: usize,

    /// Enable debug logging (`RUST_LOG` takes precedence when set).
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check every solution found against the graph or formula.
    #[arg(short, long, default_value_t = false)]
    pub(crate) verify: bool,

    /// Print performance and problem statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Print the model of a satisfiable CNF file.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// SAT backend.
    #[arg(long, value_enum, default_value_t = BackendType::Cdcl)]
    backend: BackendType,

    /// Branching heuristic of the CDCL backend.
    #[arg(long, value_enum, default_value_t = VariableSelectionType::Vsids)]
    variable_selection: VariableSelectionType,

    /// Restart schedule of the CDCL backend.
    #[arg(long, value_enum, default_value_t = RestarterType::Luby)]
    restart_strategy: RestarterType,

    /// Refuse to allocate more than this many variables.
    #[arg(long)]
    max_variables: Option<usize>,

    /// Refuse to record more than this many clauses.
    #[arg(long)]
    max_clauses: Option<usize>,
}

impl CommonOptions {
    pub(crate) fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            backend: self.backend,
            variable_selection: self.variable_selection,
            restart_strategy: self.restart_strategy,
            limits: BackendLimits {
                max_variables: self.max_variables,
                max_clauses: self.max_clauses,
            },
        }
    }
}

/// Failures reported by the command line front-end.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Graph(#[from] GraphParseError),

    #[error("{0}")]
    Coloring(#[from] ColoringError),

    #[error("{0}")]
    Dimacs(#[from] DimacsError),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Sudoku(#[from] SudokuError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("solution failed verification")]
    Verification,
}

/// Installs the `tracing` subscriber. `RUST_LOG` overrides the level implied by
/// `--debug`.
pub(crate) fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub(crate) fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(common) = cli.command.common() {
        init_tracing(common.debug);
    }

    match cli.command {
        Commands::Check { path, common } => check(&path, &common),
        Commands::Enumerate {
            path,
            limit,
            common,
        } => enumerate(&path, limit, &common),
        Commands::Export {
            path,
            output,
            common,
        } => export(&path, output.as_deref(), &common),
        Commands::File { path, common } => solve_file(&path, &common),
        Commands::Sudoku {
            path,
            export_dimacs,
            common,
        } => solve_sudoku(&path, export_dimacs, &common),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sat-coloring", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_graph(path: &Path) -> Result<(Graph, Duration), CliError> {
    let time = Instant::now();
    let graph = parse_col_file(path)?;
    let elapsed = time.elapsed();
    debug!(path = %path.display(), "loaded graph");
    Ok((graph, elapsed))
}

fn new_problem<'g>(
    graph: &'g Graph,
    common: &CommonOptions,
) -> Result<ColoringProblem<'g, BackendImpls>, CliError> {
    let backend = common.backend_config().build();
    Ok(ColoringProblem::with_backend(
        graph,
        common.colors,
        backend,
    )?)
}

pub(crate) fn check(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    let (graph, parse_time) = load_graph(path)?;
    let mut problem = new_problem(&graph, common)?;

    epoch::advance().ok();
    let time = Instant::now();
    let colorable = problem.is_colorable()?;
    let elapsed = time.elapsed();

    if common.stats {
        print_coloring_stats(&problem, parse_time, elapsed, None);
    }

    if colorable {
        println!("\n{}-COLORABLE", common.colors);
    } else {
        println!("\nNOT {}-COLORABLE", common.colors);
    }
    Ok(())
}

pub(crate) fn enumerate(
    path: &Path,
    limit: Option<usize>,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let (graph, parse_time) = load_graph(path)?;
    let mut problem = new_problem(&graph, common)?;

    epoch::advance().ok();
    let time = Instant::now();
    let colorings = problem.all_colorings()?;
    let elapsed = time.elapsed();

    if common.verify {
        verify_colorings(&graph, &colorings)?;
    }

    for (i, coloring) in colorings
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
    {
        println!("{}: {}", i + 1, render_coloring(coloring));
    }

    if common.stats {
        print_coloring_stats(&problem, parse_time, elapsed, Some(colorings.len()));
    }

    println!("\nColorings: {}", colorings.len());
    Ok(())
}

pub(crate) fn export(
    path: &Path,
    output: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let (graph, _) = load_graph(path)?;
    let mut problem = new_problem(&graph, common)?;

    match output {
        Some(out) => {
            let writer = BufWriter::new(File::create(out)?);
            problem.export_dimacs(writer)?;
            eprintln!("DIMACS written to: {}", out.display());
        }
        None => {
            let stdout = io::stdout();
            problem.export_dimacs(stdout.lock())?;
        }
    }
    Ok(())
}

pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    let time = Instant::now();
    let cnf = parse_file(path)?;
    let parse_time = time.elapsed();

    let mut solver = common.backend_config().build();
    solver.add_cnf(&cnf)?;

    epoch::advance().ok();
    let time = Instant::now();
    let result = solver.solve();
    let elapsed = time.elapsed();

    let model = result.is_sat().then(|| solver.model());

    if common.verify {
        if let Some(model) = &model {
            let ok = cnf.verify(model);
            println!("Verified: {ok:?}");
            if !ok {
                return Err(CliError::Verification);
            }
        }
    }

    if common.stats {
        let (allocated, resident) = memory_mib();
        print_stats(
            parse_time,
            elapsed,
            &[
                ("Variables", cnf.num_vars),
                ("Clauses", cnf.len()),
                ("Literals", cnf.num_literals()),
            ],
            &solver.stats(),
            allocated,
            resident,
        );
    }

    if common.print_solution {
        if let Some(model) = &model {
            let values: Vec<String> = model
                .iter()
                .enumerate()
                .map(|(v, state)| {
                    let lit = v + 1;
                    if state.is_true() {
                        lit.to_string()
                    } else {
                        format!("-{lit}")
                    }
                })
                .collect();
            println!("v {} 0", values.join(" "));
        }
    }

    println!("\n{result}");
    Ok(())
}

/// Solve a Sudoku file and print the filled grid.
pub(crate) fn solve_sudoku(
    path: &Path,
    export_dimacs: bool,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let time = Instant::now();
    let sudoku = parse_sudoku_file(path)?;
    let graph = sudoku.graph()?;
    let parse_time = time.elapsed();
    println!("Parsed Sudoku:\n{sudoku}");

    let mut problem = sudoku.problem(&graph, common.backend_config().build())?;

    if export_dimacs {
        let dimacs_path = PathBuf::from(format!("{}.cnf", path.display()));
        problem.export_dimacs(BufWriter::new(File::create(&dimacs_path)?))?;
        eprintln!("DIMACS written to: {}", dimacs_path.display());
    }

    epoch::advance().ok();
    let time = Instant::now();
    let coloring = problem.find_coloring()?;
    let elapsed = time.elapsed();
    let solution = coloring.as_ref().and_then(|c| sudoku.decode(c));

    if common.verify {
        if let Some(solution) = &solution {
            let ok = solution.is_solution_of(&sudoku);
            println!("Verified: {ok:?}");
            if !ok {
                return Err(CliError::Verification);
            }
        }
    }

    if common.stats {
        print_coloring_stats(&problem, parse_time, elapsed, None);
    }

    match solution {
        Some(solution) => println!("\nSolution:\n{solution}"),
        None => println!("\nNo solution found"),
    }
    Ok(())
}

fn verify_colorings(graph: &Graph, colorings: &[Coloring]) -> Result<(), CliError> {
    let ok = colorings.iter().all(|c| c.is_proper(graph));
    println!("Verified: {ok:?}");
    if ok {
        Ok(())
    } else {
        Err(CliError::Verification)
    }
}

/// Colors as 1-based numbers, one per node in node order.
fn render_coloring(coloring: &Coloring) -> String {
    coloring
        .node_colors()
        .iter()
        .map(|c| c.map_or_else(|| "?".to_string(), |c| (c + 1).to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_mib() -> (f64, f64) {
    let read = || -> Result<(usize, usize), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        Ok((stats::allocated::read()?, stats::resident::read()?))
    };
    read().map_or((0.0, 0.0), |(allocated, resident)| {
        (
            allocated as f64 / (1024.0 * 1024.0),
            resident as f64 / (1024.0 * 1024.0),
        )
    })
}

fn print_coloring_stats<B: Solver>(
    problem: &ColoringProblem<'_, B>,
    parse_time: Duration,
    elapsed: Duration,
    solutions: Option<usize>,
) {
    let graph = problem.graph();
    let encoding = problem.encoding_stats().unwrap_or_default();
    let mut lines = vec![
        ("Nodes", graph.node_count()),
        ("Edges", graph.edge_count()),
        ("Colors", problem.color_count()),
        ("Variables", encoding.variables),
        ("Clauses (encoding)", encoding.clauses),
        ("Clauses (incl. blocking)", problem.backend().num_clauses()),
    ];
    if let Some(count) = solutions {
        lines.push(("Colorings", count));
    }

    let (allocated, resident) = memory_mib();
    print_stats(
        parse_time,
        elapsed,
        &lines,
        &problem.backend().stats(),
        allocated,
        resident,
    );
}

pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    problem: &[(&str, usize)],
    s: &SolutionStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    for (label, value) in problem {
        stat_line(label, value);
    }

    println!("========================[ Search Statistics ]========================");
    stat_line("Solve calls", s.solves);
    stat_line("Learnt clauses", s.learnt_clauses);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Restarts", s.restarts, elapsed_secs);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_common_options() {
        let cli = Cli::try_parse_from([
            "sat-coloring",
            "enumerate",
            "--path",
            "g.col",
            "-k",
            "4",
            "--backend",
            "dpll",
            "--limit",
            "2",
            "--max-clauses",
            "100",
        ])
        .unwrap();
        let Commands::Enumerate {
            limit, common, ..
        } = cli.command
        else {
            panic!("expected enumerate");
        };
        assert_eq!(limit, Some(2));
        assert_eq!(common.colors, 4);
        let config = common.backend_config();
        assert_eq!(config.backend, BackendType::Dpll);
        assert_eq!(config.limits.max_clauses, Some(100));
        assert_eq!(config.limits.max_variables, None);
    }

    #[test]
    fn test_parse_sudoku_command() {
        let cli = Cli::try_parse_from([
            "sat-coloring",
            "sudoku",
            "--path",
            "puzzle.sudoku",
            "--export-dimacs",
            "--backend",
            "dpll",
        ])
        .unwrap();
        let Commands::Sudoku {
            path,
            export_dimacs,
            common,
        } = cli.command
        else {
            panic!("expected sudoku");
        };
        assert_eq!(path, PathBuf::from("puzzle.sudoku"));
        assert!(export_dimacs);
        assert_eq!(common.backend_config().backend, BackendType::Dpll);
    }

    #[test]
    fn test_render_coloring() {
        let mut graph = Graph::new(2);
        graph.add_edge(0, 1).unwrap();
        let mut problem = ColoringProblem::new(&graph, 2).unwrap();
        let colorings = problem.all_colorings().unwrap();
        let mut rendered: Vec<String> = colorings.iter().map(render_coloring).collect();
        rendered.sort();
        assert_eq!(rendered, vec!["1 2", "2 1"]);
    }
}
