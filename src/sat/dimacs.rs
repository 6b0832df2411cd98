#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing the DIMACS CNF format.
//!
//! The format is line based:
//! - Comment lines start with `c`.
//! - A problem line `p cnf <num_variables> <num_clauses>`.
//! - Clauses as whitespace separated non-zero integers (positive for a variable,
//!   negative for its negation), each clause terminated by `0`. A clause may span
//!   several lines, and several clauses may share a line.
//! - An optional `%` line ends the data (a convention of some benchmark sets).
//!
//! The parser honours the variable count of the problem line as a lower bound and
//! grows it if clauses mention larger variables. The clause count is advisory.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use itertools::Itertools;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Errors raised while reading DIMACS CNF input.
#[derive(Debug, thiserror::Error)]
pub enum DimacsError {
    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// A token that is not an integer literal.
    #[error("line {line}: invalid literal `{token}`")]
    InvalidLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A `p` line that is not `p cnf <vars> <clauses>`.
    #[error("line {line}: malformed problem line `{text}`")]
    InvalidProblemLine {
        /// 1-based line number.
        line: usize,
        /// The whole line.
        text: String,
    },

    /// Input ended inside a clause.
    #[error("last clause is not terminated by 0")]
    UnterminatedClause,
}

fn parse_problem_line(line_no: usize, text: &str) -> Result<usize, DimacsError> {
    let invalid = || DimacsError::InvalidProblemLine {
        line: line_no,
        text: text.to_string(),
    };
    let fields = text.split_whitespace().collect_vec();
    match fields.as_slice() {
        ["p", "cnf", vars, clauses] => {
            clauses.parse::<usize>().map_err(|_| invalid())?;
            vars.parse::<usize>().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Parses DIMACS CNF from `reader`.
///
/// # Errors
///
/// - `DimacsError::Io` if reading fails.
/// - `DimacsError::InvalidLiteral` for a token that is not an integer, or is out
///   of the literal range.
/// - `DimacsError::InvalidProblemLine` for a `p` line that is not `p cnf V C`.
/// - `DimacsError::UnterminatedClause` if the input ends inside a clause.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, DimacsError> {
    let mut cnf = Cnf::default();
    let mut declared_vars = 0;
    let mut current: Vec<Literal> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim_start();

        match trimmed.chars().next() {
            None | Some('c') => continue,
            Some('%') => break,
            Some('p') => {
                declared_vars = parse_problem_line(line_no, trimmed)?;
                continue;
            }
            Some(_) => {}
        }

        for token in trimmed.split_whitespace() {
            let value = token
                .parse::<i32>()
                .map_err(|_| DimacsError::InvalidLiteral {
                    line: line_no,
                    token: token.to_string(),
                })?;

            if value == 0 {
                cnf.push(Clause::new(&current));
                current.clear();
                continue;
            }

            let lit = Literal::from_i32(value).ok_or_else(|| DimacsError::InvalidLiteral {
                line: line_no,
                token: token.to_string(),
            })?;
            current.push(lit);
        }
    }

    if !current.is_empty() {
        return Err(DimacsError::UnterminatedClause);
    }

    cnf.num_vars = cnf.num_vars.max(declared_vars);
    Ok(cnf)
}

/// Parses the DIMACS CNF file at `path`.
///
/// # Errors
///
/// `DimacsError::Io` if the file cannot be opened, and anything
/// [`parse_dimacs`] reports.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Cnf, DimacsError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

/// Writes `cnf` as DIMACS: a `p cnf` header, then one clause per line.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_dimacs<W: Write>(cnf: &Cnf, mut writer: W) -> io::Result<()> {
    write!(writer, "{cnf}")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Cnf, DimacsError> {
        parse_dimacs(text.as_bytes())
    }

    #[test]
    fn test_parse_basic() {
        let cnf = parse("c a comment\np cnf 3 2\n1 -2 0\n2 3 0\n").unwrap();
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.len(), 2);
        assert_eq!(
            cnf[0].literals.as_slice(),
            &[Literal::positive(0), Literal::negative(1)]
        );
    }

    #[test]
    fn test_clause_spanning_lines() {
        let cnf = parse("p cnf 4 2\n1 2\n3 0 -4\n0\n").unwrap();
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf[0].len(), 3);
        assert_eq!(cnf[1].literals.as_slice(), &[Literal::negative(3)]);
    }

    #[test]
    fn test_declared_vars_are_a_lower_bound() {
        let cnf = parse("p cnf 10 1\n1 0\n").unwrap();
        assert_eq!(cnf.num_vars, 10);
        let grown = parse("p cnf 1 1\n5 0\n").unwrap();
        assert_eq!(grown.num_vars, 5);
    }

    #[test]
    fn test_percent_ends_input() {
        let cnf = parse("p cnf 2 1\n1 2 0\n%\n0\n").unwrap();
        assert_eq!(cnf.len(), 1);
    }

    #[test]
    fn test_lone_zero_is_empty_clause() {
        let cnf = parse("p cnf 1 1\n0\n").unwrap();
        assert_eq!(cnf.len(), 1);
        assert!(cnf[0].is_empty());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("p cnf 2 1\n1 x 0\n"),
            Err(DimacsError::InvalidLiteral { line: 2, .. })
        ));
        assert!(matches!(
            parse("p dnf 2 1\n"),
            Err(DimacsError::InvalidProblemLine { line: 1, .. })
        ));
        assert!(matches!(
            parse("p cnf 2 1\n1 2\n"),
            Err(DimacsError::UnterminatedClause)
        ));
    }

    #[test]
    fn test_write_then_parse() {
        let cnf = Cnf::from_dimacs_clauses(vec![vec![1, -3], vec![2], vec![-1, -2, 3]]);
        let mut buf = Vec::new();
        write_dimacs(&cnf, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("p cnf 3 3\n"));
        assert_eq!(parse(&text).unwrap(), cnf);
    }
}
