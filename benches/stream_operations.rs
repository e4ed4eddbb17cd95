use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rs2_step::stream::{from_iter, range, replicate, StreamExt};
use rs2_step::StreamError;
use tokio::runtime::Runtime;

fn bench_fused_chain(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("fused_chain");

    for size in [1_000u64, 10_000, 100_000, 1_000_000].iter() {
        group.bench_with_input(BenchmarkId::new("step_stream", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = range(0, size)
                    .map(|x| black_box(x * 2))
                    .filter(|x| black_box(x % 3 != 0))
                    .enumerate()
                    .take_while(|(i, _)| *i < 900_000)
                    .map(|(_, x)| x)
                    .sum()
                    .await;
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("iterator", size), size, |b, &size| {
            b.iter(|| {
                let result: u64 = (0..size)
                    .map(|x| black_box(x * 2))
                    .filter(|x| black_box(x % 3 != 0))
                    .enumerate()
                    .take_while(|(i, _)| *i < 900_000)
                    .map(|(_, x)| x)
                    .sum();
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("boxed_step_stream", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = range(0, size)
                    .boxed()
                    .map(|x| black_box(x * 2))
                    .boxed()
                    .filter(|x| black_box(x % 3 != 0))
                    .boxed()
                    .sum()
                    .await;
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("nested");

    for size in [100usize, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("concat_map", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = from_iter(0..size)
                    .concat_map(|n| replicate(n % 8, n))
                    .length()
                    .await;
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("map_effect", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = from_iter(0..size)
                    .fallible::<StreamError>()
                    .map_effect(|x| async move { Ok(black_box(x + 1)) })
                    .fold_left_strict(0usize, |acc, x| acc + x)
                    .await;
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fused_chain, bench_nested);
criterion_main!(benches);
