use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::Rng;
use rankboard::sim::{rng_from, seed_entities};
use rankboard::{Entity, RankingIndex};

fn seeded(count: usize) -> RankingIndex {
    let index = RankingIndex::default();
    seed_entities(&index, count, &mut rng_from(Some(42)));
    index
}

fn criterion_benchmark(c: &mut Criterion) {
    let index = seeded(10_000);
    let mut rng = rng_from(Some(7));

    c.bench_function("update_score", |b| {
        b.iter(|| {
            let id = rng.random_range(1..=10_000);
            let delta = rng.random_range(-50..50);
            black_box(index.update_score(id, delta))
        })
    });

    c.bench_function("top_50", |b| b.iter(|| black_box(index.top(50))));

    c.bench_function("search_prefix", |b| b.iter(|| black_box(index.search("rah"))));

    c.bench_function("add_10k", |b| {
        b.iter_batched(
            RankingIndex::default,
            |index| {
                for id in 0..10_000i64 {
                    index.add(Entity::new(id, format!("bench_{}", id), 100 + (id % 4900) as i32));
                }
                index
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
