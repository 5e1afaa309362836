//! Step generation benchmarks.
//!
//! Generators run once per user action, so these measure the latency a
//! user sees between pressing a key and the first frame.
//!
//! Run with: cargo bench --bench step_generation

use algoviz::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic shuffled input without pulling in an RNG.
fn scrambled(n: usize) -> Vec<i64> {
    (0..n as i64).map(|i| (i * 7919) % (n as i64 * 3)).collect()
}

fn bench_sorting(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorting");
    group.sample_size(50);

    for n in [8, 32, 128] {
        let input = scrambled(n);
        for alg in [SortAlgorithm::Bubble, SortAlgorithm::Quick, SortAlgorithm::Merge] {
            group.bench_with_input(BenchmarkId::new(alg.name(), n), &input, |b, input| {
                b.iter(|| black_box(sorting::generate_steps(alg, input)).len());
            });
        }
    }

    group.finish();
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_traversal");
    let graph = Graph::example();

    for alg in [GraphAlgorithm::Bfs, GraphAlgorithm::Dfs] {
        group.bench_function(alg.name(), |b| {
            b.iter(|| black_box(graph.traverse(alg, Some("A"))).map(|run| run.log.len()));
        });
    }

    group.finish();
}

fn bench_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("structures");

    let values = scrambled(64);
    let mut distinct = values.clone();
    distinct.sort_unstable();
    distinct.dedup();

    group.bench_function("bst_build_64", |b| {
        b.iter(|| Bst::from_values(black_box(&distinct), Default::default()).map(|t| t.len()));
    });

    let tree = Bst::from_values(&distinct, Default::default()).ok();
    group.bench_function("bst_insert", |b| {
        b.iter(|| tree.as_ref().map(|t| t.insert(black_box(-1)).is_ok()));
    });

    let heap = Heap::from_values(HeapKind::Max, &values, Default::default());
    group.bench_function("heap_insert_extract", |b| {
        b.iter(|| {
            let inserted = heap.insert(black_box(1000)).next;
            inserted.extract().map(|c| c.next.len())
        });
    });

    group.bench_function("hash_insert_chaining", |b| {
        b.iter(|| -> Option<usize> {
            let mut table = HashTable::new(17, CollisionStrategy::Chaining, HashFunction::Fnv).ok()?;
            for key in ["apple", "melon", "grape", "lemon", "peach"] {
                table = table.insert(key, "1").ok()?.next;
            }
            Some(table.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sorting, bench_graph, bench_structures);
criterion_main!(benches);
