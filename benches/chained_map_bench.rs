use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use prime_hashmap::{find_mode, hash_function_2, ChainedMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("chained_map_put_10k", |b| {
        b.iter_batched(
            || ChainedMap::<u64, _>::new(10_007, hash_function_2),
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.put(&key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_overloaded(c: &mut Criterion) {
    // Load factor near 20: every lookup walks a long chain.
    c.bench_function("chained_map_get_hit_load_20", |b| {
        let mut m = ChainedMap::new(1_000, hash_function_2);
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.put(k, i as u64);
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chained_map_get_miss", |b| {
        let mut m = ChainedMap::new(10_007, hash_function_2);
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.put(&key(x), i as u64);
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(m.get(&k));
        })
    });
}

fn bench_resize(c: &mut Criterion) {
    c.bench_function("chained_map_resize_grow_10k", |b| {
        b.iter_batched(
            || {
                let mut m = ChainedMap::new(101, hash_function_2);
                for (i, x) in lcg(5).take(10_000).enumerate() {
                    m.put(&key(x), i as u64);
                }
                m
            },
            |mut m| {
                m.resize_table(20_000).unwrap();
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_mode(c: &mut Criterion) {
    c.bench_function("find_mode_10k_of_500", |b| {
        let items: Vec<String> = lcg(13).take(10_000).map(|x| key(x % 500)).collect();
        b.iter(|| black_box(find_mode(&items)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit_overloaded, bench_get_miss, bench_resize, bench_find_mode
}
criterion_main!(benches);
