//! Benchmarks for submission overhead vs plain sequential execution

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use threadwell::WorkerPool;

fn sequential_sum(n: u64) -> u64 {
    (0..n).map(|i| i * i).sum()
}

fn pooled_sum(pool: &WorkerPool, n: u64) -> u64 {
    let handles: Vec<_> = (0..n).map(|i| pool.submit(move || i * i)).collect();
    handles.into_iter().map(|h| h.join().unwrap()).sum()
}

fn bench_submit_join(c: &mut Criterion) {
    let mut pool = WorkerPool::with_threads(4).unwrap();
    pool.start().unwrap();

    let mut group = c.benchmark_group("submit_join");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, &size| {
            b.iter(|| sequential_sum(black_box(size)))
        });

        group.bench_with_input(BenchmarkId::new("pooled", size), size, |b, &size| {
            b.iter(|| pooled_sum(&pool, black_box(size)))
        });
    }

    group.finish();
    pool.shutdown();
}

criterion_group!(benches, bench_submit_join);
criterion_main!(benches);
