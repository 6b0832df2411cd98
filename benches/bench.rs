use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sat_coloring::coloring::{ColoringProblem, Graph};
use sat_coloring::sat::configs::{BackendConfig, BackendType};
use sat_coloring::sat::restarter::RestarterType;
use sat_coloring::sat::variable_selection::VariableSelectionType;
use std::hint::black_box;
use std::time::Duration;

/// Erdős–Rényi style graph with a fixed seed.
fn random_graph(nodes: usize, edge_probability: f64, seed: u64) -> Graph {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut graph = Graph::new(nodes);
    for a in 0..nodes {
        for b in (a + 1)..nodes {
            if rng.f64() < edge_probability {
                graph
                    .add_edge(a, b)
                    .unwrap_or_else(|e| panic!("generated edge rejected: {e}"));
            }
        }
    }
    graph
}

fn is_colorable(graph: &Graph, k: usize, config: BackendConfig) -> bool {
    let mut problem = ColoringProblem::with_backend(graph, k, config.build())
        .unwrap_or_else(|e| panic!("problem setup failed: {e}"));
    problem
        .is_colorable()
        .unwrap_or_else(|e| panic!("decision failed: {e}"))
}

fn count_colorings(graph: &Graph, k: usize, config: BackendConfig) -> usize {
    let mut problem = ColoringProblem::with_backend(graph, k, config.build())
        .unwrap_or_else(|e| panic!("problem setup failed: {e}"));
    problem
        .all_colorings()
        .unwrap_or_else(|e| panic!("enumeration failed: {e}"))
        .len()
}

fn backend(backend: BackendType) -> BackendConfig {
    BackendConfig {
        backend,
        ..BackendConfig::default()
    }
}

fn bench_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("coloring - decision");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("cycle-101 k=2", Graph::cycle(101), 2),
        ("complete-9 k=8", Graph::complete(9), 8),
        ("random-60 k=4", random_graph(60, 0.1, 7), 4),
    ];

    for (name, graph, k) in &cases {
        group.bench_with_input(BenchmarkId::new("cdcl", name), graph, |b, g| {
            b.iter(|| black_box(is_colorable(g, *k, backend(BackendType::Cdcl))));
        });
    }

    group.finish();
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("coloring - enumeration");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("cycle-6 k=3", Graph::cycle(6), 3),
        ("complete-5 k=5", Graph::complete(5), 5),
        ("random-7 k=3", random_graph(7, 0.4, 11), 3),
    ];

    for (name, graph, k) in &cases {
        for kind in [BackendType::Cdcl, BackendType::Dpll] {
            group.bench_with_input(BenchmarkId::new(kind.to_string(), name), graph, |b, g| {
                b.iter(|| black_box(count_colorings(g, *k, backend(kind))));
            });
        }
    }

    group.finish();
}

fn bench_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("coloring - cdcl heuristics");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let graph = random_graph(40, 0.15, 3);

    for selection in [
        VariableSelectionType::Vsids,
        VariableSelectionType::Fixed,
        VariableSelectionType::Random,
    ] {
        for restart in [RestarterType::Luby, RestarterType::Geometric, RestarterType::Never] {
            let config = BackendConfig {
                variable_selection: selection,
                restart_strategy: restart,
                ..BackendConfig::default()
            };
            let id = format!("{selection:?}/{restart:?}");
            group.bench_function(id, |b| {
                b.iter(|| black_box(is_colorable(&graph, 4, config)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_decision, bench_enumeration, bench_heuristics);

criterion_main!(benches);
