use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lamina::{CoffmanGraham, Dag, LayeredGraph, NodeId, OptimalDecrossing};
use std::hint::black_box;
use std::time::Duration;

fn build_dag(node_count: usize, fanout: usize) -> Dag {
    let mut g = Dag::new();
    for i in 0..node_count {
        g.add_node(format!("n{i}"));
    }
    // A spine to guarantee connectivity.
    for i in 0..node_count.saturating_sub(1) {
        g.add_edge(NodeId(i), NodeId(i + 1)).unwrap();
    }
    // Deterministic extra forward edges.
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for i in 0..node_count {
        for _ in 0..fanout {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let span = 2 + (state >> 33) as usize % 3;
            if i + span < node_count {
                g.add_edge(NodeId(i), NodeId(i + span)).unwrap();
            }
        }
    }
    g
}

fn bench_layering(c: &mut Criterion) {
    let mut group = c.benchmark_group("coffman_graham");
    for &n in &[50usize, 200, 1000] {
        let dag = build_dag(n, 2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &dag, |b, dag| {
            b.iter(|| black_box(CoffmanGraham::new().assign(dag).unwrap()));
        });
    }
    group.finish();
}

fn bench_decross(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_decrossing");
    group.measurement_time(Duration::from_secs(10));
    for &n in &[6usize, 9, 12] {
        let dag = build_dag(n, 1);
        let assignment = CoffmanGraham::new().width(3).unwrap().assign(&dag).unwrap();
        let layered = LayeredGraph::from_assignment(&dag, &assignment).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &layered, |b, layered| {
            b.iter_batched(
                || layered.clone(),
                |mut g| black_box(OptimalDecrossing::new().decross(&mut g).unwrap()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layering, bench_decross);
criterion_main!(benches);
