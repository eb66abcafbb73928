use core::hint::black_box;

use criterion::BatchSize;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use probe_hash::HashMap as ProbeHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const SIZES: &[usize] = &[1_000, 100_000];

fn unique_keys(rng: &mut SmallRng, count: usize) -> Vec<u64> {
    let mut seen = hashbrown::HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key = rng.random::<u64>();
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0xDEADBEEF);

    let mut group = c.benchmark_group("insert");
    for &size in SIZES {
        let keys = unique_keys(&mut rng, size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map: ProbeHashMap<u64, u64> = ProbeHashMap::new();
                    for key in keys {
                        map.insert(key, key);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = hashbrown::HashMap::new();
                    for key in keys {
                        map.insert(key, key);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = std::collections::HashMap::new();
                    for key in keys {
                        map.insert(key, key);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0xBADC0FFEE);

    let mut group = c.benchmark_group("lookup");
    for &size in SIZES {
        let keys = unique_keys(&mut rng, size);
        let mut probe: ProbeHashMap<u64, u64> = ProbeHashMap::new();
        let mut brown = hashbrown::HashMap::new();
        let mut std_map = std::collections::HashMap::new();
        for &key in &keys {
            probe.insert(key, key);
            brown.insert(key, key);
            std_map.insert(key, key);
        }

        let mut queries = keys.clone();
        queries.shuffle(&mut rng);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| {
                for key in &queries {
                    black_box(probe.get(black_box(key)));
                }
            });
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &queries {
                    black_box(brown.get(black_box(key)));
                }
            });
        });
        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for key in &queries {
                    black_box(std_map.get(black_box(key)));
                }
            });
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0x5EEDB0B);

    let mut group = c.benchmark_group("churn");
    for &size in SIZES {
        let keys = unique_keys(&mut rng, size * 2);
        let (resident, churned) = keys.split_at(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map: ProbeHashMap<u64, u64> = ProbeHashMap::new();
                    for &key in resident {
                        map.insert(key, key);
                    }
                    map
                },
                |mut map| {
                    for (&out, &incoming) in resident.iter().zip(churned) {
                        map.remove(black_box(&out));
                        map.insert(black_box(incoming), incoming);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = hashbrown::HashMap::new();
                    for &key in resident {
                        map.insert(key, key);
                    }
                    map
                },
                |mut map| {
                    for (&out, &incoming) in resident.iter().zip(churned) {
                        map.remove(black_box(&out));
                        map.insert(black_box(incoming), incoming);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_churn);
criterion_main!(benches);
