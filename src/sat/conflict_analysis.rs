#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! First-UIP conflict analysis.

use crate::sat::clause::{Clause, LiteralStorage};
use crate::sat::literal::{Literal, Variable};
use crate::sat::trail::{Reason, Trail};
use bit_vec::BitVec;

/// Result of analysing a conflict at a non-root level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis {
    /// The learnt clause. `literals[0]` is the asserting literal; if there is more
    /// than one literal, `literals[1]` belongs to `backtrack_level`.
    pub learnt: LiteralStorage,
    /// Level to backjump to.
    pub backtrack_level: usize,
    /// Variables seen during resolution, for activity bumping.
    pub bumped: Vec<Variable>,
}

/// Resolves the conflicting clause against reasons on the trail until a single
/// literal of the current decision level remains.
///
/// Reason clauses must have their implied literal at position 0. `seen` must be
/// all-false on entry and is all-false again on return.
///
/// # Panics
///
/// If called at decision level 0, or if the trail holds a decision where a reason
/// clause is required (both indicate a corrupted trail).
#[must_use]
pub fn analyse_conflict(
    clauses: &[Clause],
    trail: &Trail,
    conflict: usize,
    seen: &mut BitVec,
) -> Analysis {
    let level = trail.decision_level();
    assert!(level > 0, "conflict analysis at the root level");

    let mut learnt = LiteralStorage::new();
    learnt.push(Literal::default());
    let mut bumped = Vec::new();

    let mut path_count = 0_usize;
    let mut pivot: Option<Literal> = None;
    let mut cref = conflict;
    let mut idx = trail.len();

    loop {
        let skip = usize::from(pivot.is_some());
        for &lit in clauses[cref].iter().skip(skip) {
            let var = lit.variable();
            if seen[var as usize] || trail.level(var) == 0 {
                continue;
            }
            seen.set(var as usize, true);
            bumped.push(var);
            if trail.level(var) >= level {
                path_count += 1;
            } else {
                learnt.push(lit);
            }
        }

        loop {
            idx -= 1;
            if seen[trail[idx].lit.variable() as usize] {
                break;
            }
        }

        let lit = trail[idx].lit;
        seen.set(lit.variable() as usize, false);
        path_count -= 1;
        pivot = Some(lit);

        if path_count == 0 {
            break;
        }

        cref = match trail.reason(lit.variable()) {
            Reason::Clause(c) => c,
            Reason::Decision | Reason::Unit => {
                unreachable!("literal above the UIP has no reason clause")
            }
        };
    }

    if let Some(uip) = pivot {
        learnt[0] = uip.negated();
    }

    for lit in learnt.iter().skip(1) {
        seen.set(lit.variable() as usize, false);
    }

    let backtrack_level = if learnt.len() == 1 {
        0
    } else {
        let (pos, max_level) = learnt
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, l)| (i, trail.level(l.variable())))
            .max_by_key(|&(_, lvl)| lvl)
            .unwrap_or((1, 0));
        learnt.swap(1, pos);
        max_level
    };

    Analysis {
        learnt,
        backtrack_level,
        bumped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learns_uip_clause() {
        // x4 decided at level 1; x0 decided at level 2 implies x1 and x2, which
        // conflicts with (¬x1 ∨ ¬x2 ∨ ¬x4).
        let clauses = vec![
            Clause::new(&[Literal::positive(1), Literal::negative(0)]),
            Clause::new(&[Literal::positive(2), Literal::negative(0)]),
            Clause::new(&[
                Literal::negative(1),
                Literal::negative(2),
                Literal::negative(4),
            ]),
        ];

        let mut trail = Trail::new(5);
        trail.new_decision_level();
        trail.push(Literal::positive(4), Reason::Decision);
        trail.new_decision_level();
        trail.push(Literal::positive(0), Reason::Decision);
        trail.push(Literal::positive(1), Reason::Clause(0));
        trail.push(Literal::positive(2), Reason::Clause(1));

        let mut seen = BitVec::from_elem(5, false);
        let analysis = analyse_conflict(&clauses, &trail, 2, &mut seen);

        assert_eq!(analysis.learnt[0], Literal::negative(0));
        assert_eq!(analysis.learnt.len(), 2);
        assert_eq!(analysis.learnt[1], Literal::negative(4));
        assert_eq!(analysis.backtrack_level, 1);
        assert!(seen.none());
    }

    #[test]
    fn test_unit_learnt_clause_backtracks_to_root() {
        let clauses = vec![
            Clause::new(&[Literal::positive(1), Literal::negative(0)]),
            Clause::new(&[Literal::negative(1), Literal::negative(0)]),
        ];
        let mut trail = Trail::new(2);
        trail.new_decision_level();
        trail.push(Literal::positive(0), Reason::Decision);
        trail.push(Literal::positive(1), Reason::Clause(0));

        let mut seen = BitVec::from_elem(2, false);
        let analysis = analyse_conflict(&clauses, &trail, 1, &mut seen);

        assert_eq!(analysis.learnt.as_slice(), &[Literal::negative(0)]);
        assert_eq!(analysis.backtrack_level, 0);
    }
}
