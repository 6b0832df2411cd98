//! Property tests: the SAT-based enumeration matches a brute-force enumerator on
//! random small graphs.

use proptest::prelude::*;
use sat_coloring::coloring::{Coloring, ColoringProblem, Graph};
use sat_coloring::sat::dpll::Dpll;
use std::collections::BTreeSet;

/// Random graph on up to `max_nodes` nodes; edges are oriented before insertion
/// and may repeat.
fn graph_upto(max_nodes: usize) -> impl Strategy<Value = Graph> {
    (0usize..=max_nodes).prop_flat_map(|n| {
        let max = n.max(1);
        prop::collection::vec((0..max, 0..max), 0..=10).prop_map(move |pairs| {
            let mut g = Graph::new(n);
            if n > 0 {
                for (u, v) in pairs {
                    g.add_edge(u.min(v), u.max(v)).unwrap();
                }
            }
            g
        })
    })
}

/// Every proper coloring, found by trying all `k^n` node-to-color maps.
fn brute_force(g: &Graph, k: usize) -> BTreeSet<Vec<Option<usize>>> {
    let n = g.node_count();
    let mut found = BTreeSet::new();
    let mut colors = vec![0; n];
    loop {
        if g.edges().all(|(a, b)| colors[a] != colors[b]) {
            found.insert(colors.iter().map(|&c| Some(c)).collect());
        }
        let mut i = 0;
        loop {
            if i == n {
                return found;
            }
            colors[i] += 1;
            if colors[i] < k {
                break;
            }
            colors[i] = 0;
            i += 1;
        }
    }
}

fn small_graph() -> impl Strategy<Value = Graph> {
    graph_upto(6)
}

fn as_color_maps(colorings: &[Coloring]) -> BTreeSet<Vec<Option<usize>>> {
    colorings.iter().map(Coloring::node_colors).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn enumeration_matches_brute_force(g in small_graph(), k in 1usize..=3) {
        let mut problem = ColoringProblem::new(&g, k).unwrap();
        let colorings = problem.all_colorings().unwrap();

        let distinct: BTreeSet<_> = colorings.iter().map(|c| c.values().to_vec()).collect();
        prop_assert_eq!(distinct.len(), colorings.len());

        for coloring in &colorings {
            prop_assert!(coloring.is_proper(&g));
            prop_assert_eq!(coloring.values().len(), k * g.node_count());
        }

        prop_assert_eq!(as_color_maps(&colorings), brute_force(&g, k));
    }

    #[test]
    fn decision_matches_enumeration(g in small_graph(), k in 1usize..=3) {
        let colorable = ColoringProblem::new(&g, k).unwrap().is_colorable().unwrap();
        prop_assert_eq!(colorable, !brute_force(&g, k).is_empty());
    }

    // DPLL re-solves from scratch after every blocking clause, so keep it small.
    #[test]
    fn cdcl_and_dpll_agree(g in graph_upto(4), k in 1usize..=3) {
        let from_cdcl = ColoringProblem::new(&g, k).unwrap().all_colorings().unwrap();
        let from_dpll = ColoringProblem::with_backend(&g, k, Dpll::default())
            .unwrap()
            .all_colorings()
            .unwrap();
        prop_assert_eq!(as_color_maps(&from_cdcl), as_color_maps(&from_dpll));
    }
}
