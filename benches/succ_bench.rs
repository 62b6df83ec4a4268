use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use louds::{BitVector, Navigate, ReferenceTree, SuccinctTree};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn query_all<N: Navigate + ?Sized>(nav: &N, values: &[&str]) {
    for value in values {
        black_box(nav.first_child(value));
        black_box(nav.last_child(value));
        black_box(nav.children_count(value));
        black_box(nav.parent(value));
    }
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    for nodes in SIZES {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let tree = ReferenceTree::generate(nodes, &mut rng).unwrap();
        let naive = SuccinctTree::from_tree(&tree).unwrap();
        let indexed = naive.clone().into_backend::<BitVector>();
        // A fixed sample keeps the O(n) baselines affordable at 10k nodes.
        let values: Vec<&str> = tree.values().step_by((nodes / 100).max(1)).collect();

        group.bench_with_input(BenchmarkId::new("reference", nodes), &values, |b, v| {
            b.iter(|| query_all(&tree, v))
        });
        group.bench_with_input(BenchmarkId::new("louds_naive", nodes), &values, |b, v| {
            b.iter(|| query_all(&naive, v))
        });
        group.bench_with_input(BenchmarkId::new("louds_rank9", nodes), &values, |b, v| {
            b.iter(|| query_all(&indexed, v))
        });
    }
    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for nodes in SIZES {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = ReferenceTree::generate(nodes, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("from_tree", nodes), &tree, |b, t| {
            b.iter(|| SuccinctTree::from_tree(black_box(t)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_navigation, bench_construction);
criterion_main!(benches);
