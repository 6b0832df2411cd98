use sat_coloring::coloring::{Coloring, ColoringError, ColoringProblem, Graph};
use sat_coloring::sat::assignment::VarState;
use sat_coloring::sat::cdcl::Cdcl;
use sat_coloring::sat::configs::{BackendConfig, BackendType};
use sat_coloring::sat::dimacs::parse_dimacs;
use sat_coloring::sat::dpll::Dpll;
use sat_coloring::sat::solver::{BackendError, BackendLimits, Solver};
use std::collections::BTreeSet;

fn graph(nodes: usize, edges: &[(usize, usize)]) -> Graph {
    let mut g = Graph::new(nodes);
    for &(a, b) in edges {
        g.add_edge(a, b).unwrap();
    }
    g
}

fn triangle() -> Graph {
    graph(3, &[(0, 1), (1, 2), (0, 2)])
}

fn distinct_assignments(colorings: &[Coloring]) -> usize {
    colorings
        .iter()
        .map(|c| c.values().to_vec())
        .collect::<BTreeSet<_>>()
        .len()
}

#[test]
fn triangle_is_not_two_colorable() {
    let g = triangle();
    let mut problem = ColoringProblem::new(&g, 2).unwrap();
    assert!(!problem.is_colorable().unwrap());
}

#[test]
fn triangle_has_six_three_colorings() {
    let g = triangle();
    let mut problem = ColoringProblem::new(&g, 3).unwrap();
    assert!(problem.is_colorable().unwrap());

    let mut problem = ColoringProblem::new(&g, 3).unwrap();
    let colorings = problem.all_colorings().unwrap();
    assert_eq!(colorings.len(), 6);
    assert_eq!(distinct_assignments(&colorings), 6);
    assert!(colorings.iter().all(|c| c.is_proper(&g)));
}

#[test]
fn edgeless_graph_colors_nodes_independently() {
    let g = Graph::new(4);
    let mut problem = ColoringProblem::new(&g, 2).unwrap();
    let colorings = problem.all_colorings().unwrap();
    assert_eq!(colorings.len(), 16);
    assert_eq!(distinct_assignments(&colorings), 16);
}

#[test]
fn reversed_edge_is_rejected() {
    let mut g = Graph::new(3);
    assert!(matches!(
        g.add_edge(2, 1),
        Err(ColoringError::InvalidOrientation { from: 2, to: 1 })
    ));
}

#[test]
fn every_solution_has_exactly_one_color_per_node() {
    let g = graph(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
    let mut problem = ColoringProblem::new(&g, 3).unwrap();
    let colorings = problem.all_colorings().unwrap();
    // proper 3-colorings of C4: (k-1)^n + (-1)^n (k-1) = 16 + 2
    assert_eq!(colorings.len(), 18);

    for coloring in &colorings {
        for node in 0..4 {
            let trues = (0..3)
                .map(|c| coloring.value(problem.variable(node, c).unwrap()))
                .filter(|&v| v == VarState::Assigned(true))
                .count();
            assert_eq!(trues, 1);
        }
        for (a, b) in g.edges() {
            assert_ne!(coloring.color_of(a), coloring.color_of(b));
        }
    }
}

#[test]
fn decision_agrees_with_enumeration() {
    let cases = [
        (triangle(), 2),
        (triangle(), 3),
        (Graph::complete(4), 3),
        (Graph::complete(4), 4),
        (Graph::cycle(5), 2),
        (Graph::cycle(6), 2),
        (graph(2, &[(1, 1)]), 3),
    ];
    for (g, k) in &cases {
        let colorable = ColoringProblem::new(g, *k).unwrap().is_colorable().unwrap();
        let count = ColoringProblem::new(g, *k)
            .unwrap()
            .all_colorings()
            .unwrap()
            .len();
        assert_eq!(colorable, count > 0, "k = {k}, graph = {g:?}");
    }
}

#[test]
fn backends_agree() {
    let graphs = [
        Graph::cycle(5),
        Graph::complete(4),
        graph(5, &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (1, 4)]),
    ];
    for g in &graphs {
        for k in 1..=3 {
            let mut cdcl = ColoringProblem::new(g, k).unwrap();
            let mut dpll = ColoringProblem::with_backend(g, k, Dpll::default()).unwrap();
            let from_cdcl: BTreeSet<_> = cdcl
                .all_colorings()
                .unwrap()
                .iter()
                .map(Coloring::node_colors)
                .collect();
            let from_dpll: BTreeSet<_> = dpll
                .all_colorings()
                .unwrap()
                .iter()
                .map(Coloring::node_colors)
                .collect();
            assert_eq!(from_cdcl, from_dpll, "k = {k}");
        }
    }
}

#[test]
fn configured_backends_enumerate_the_same_count() {
    let g = Graph::cycle(5);
    for backend in [BackendType::Cdcl, BackendType::Dpll] {
        let config = BackendConfig {
            backend,
            ..BackendConfig::default()
        };
        let mut problem = ColoringProblem::with_backend(&g, 3, config.build()).unwrap();
        // (k-1)^n + (-1)^n (k-1) = 32 - 2
        assert_eq!(problem.all_colorings().unwrap().len(), 30);
    }
}

#[test]
fn exported_encoding_reads_back() {
    let g = triangle();
    let mut problem = ColoringProblem::new(&g, 3).unwrap();
    let mut out = Vec::new();
    problem.export_dimacs(&mut out).unwrap();

    let cnf = parse_dimacs(out.as_slice()).unwrap();
    assert_eq!(cnf.num_vars, 9);
    assert_eq!(cnf.len(), 21);
    assert_eq!(&cnf, problem.backend().cnf());

    // solving the exported formula on its own gives a colorable answer as well
    let mut solver = Dpll::default();
    solver.add_cnf(&cnf).unwrap();
    assert!(solver.solve().is_sat());
}

#[test]
fn export_includes_blocking_clauses_after_enumeration() {
    let g = graph(2, &[(0, 1)]);
    let mut problem = ColoringProblem::new(&g, 2).unwrap();
    let solutions = problem.all_colorings().unwrap().len();
    let mut out = Vec::new();
    problem.export_dimacs(&mut out).unwrap();
    let cnf = parse_dimacs(out.as_slice()).unwrap();
    let encoding = problem.encoding_stats().unwrap();
    assert_eq!(cnf.len(), encoding.clauses + solutions);
}

#[test]
fn variable_limit_surfaces_as_backend_exhausted() {
    let g = triangle();
    let backend: Cdcl = Cdcl::new(BackendLimits::default().with_max_variables(8));
    let mut problem = ColoringProblem::with_backend(&g, 3, backend).unwrap();
    assert!(matches!(
        problem.is_colorable(),
        Err(ColoringError::BackendExhausted(BackendError::VariableLimit {
            limit: 8
        }))
    ));
}

#[test]
fn clause_limit_hit_by_blocking_clauses() {
    let g = Graph::new(2);
    // 2 nodes * (1 + 1) encoding clauses, then room for one blocking clause
    let backend = Dpll::new(BackendLimits::default().with_max_clauses(5));
    let mut problem = ColoringProblem::with_backend(&g, 2, backend).unwrap();
    assert!(matches!(
        problem.all_colorings(),
        Err(ColoringError::BackendExhausted(BackendError::ClauseLimit {
            limit: 5
        }))
    ));
}

#[test]
fn single_color_only_fits_edgeless_graphs() {
    let edgeless = Graph::new(3);
    let mut problem = ColoringProblem::new(&edgeless, 1).unwrap();
    assert_eq!(problem.all_colorings().unwrap().len(), 1);

    let one_edge = graph(3, &[(0, 2)]);
    let mut problem = ColoringProblem::new(&one_edge, 1).unwrap();
    assert!(!problem.is_colorable().unwrap());
}

#[test]
fn duplicate_edges_do_not_change_the_answer() {
    let single = graph(3, &[(0, 1), (1, 2)]);
    let doubled = graph(3, &[(0, 1), (0, 1), (1, 2), (1, 2)]);
    let mut a = ColoringProblem::new(&single, 2).unwrap();
    let mut b = ColoringProblem::new(&doubled, 2).unwrap();
    let from_single: BTreeSet<_> = a
        .all_colorings()
        .unwrap()
        .iter()
        .map(Coloring::node_colors)
        .collect();
    let from_doubled: BTreeSet<_> = b
        .all_colorings()
        .unwrap()
        .iter()
        .map(Coloring::node_colors)
        .collect();
    assert_eq!(from_single.len(), 2);
    assert_eq!(from_single, from_doubled);
    assert!(b.encoding_stats().unwrap().clauses > a.encoding_stats().unwrap().clauses);
}
