use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flakecache::config::{BoundedCacheConfig, EvictionPolicy, IdGeneratorConfig};
use flakecache::{BoundedCache, IdGenerator, OrderedMap, UnboundedCache};

fn make_bounded(cap: usize, policy: EvictionPolicy) -> BoundedCache<usize, usize> {
    BoundedCache::init(BoundedCacheConfig::new(cap).with_policy(policy), None)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Cache Operations");

    for policy in [EvictionPolicy::Fifo, EvictionPolicy::Lru] {
        let cache = make_bounded(CACHE_SIZE, policy);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function(format!("{} get hit", policy.name()), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function(format!("{} get miss", policy.name()), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        // every put past the first CACHE_SIZE evicts
        group.bench_function(format!("{} put evicting", policy.name()), |b| {
            let mut next = CACHE_SIZE;
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next));
                    next += 1;
                }
            });
        });
    }

    // Single-threaded map without the lock
    {
        let mut map = OrderedMap::new(CACHE_SIZE, EvictionPolicy::Lru);
        for i in 0..CACHE_SIZE {
            map.put(i, i);
        }

        group.bench_function("OrderedMap get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(map.get(&(i % CACHE_SIZE)));
                }
            });
        });
    }

    {
        let cache = UnboundedCache::with_capacity(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function("UNBOUNDED get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });
    }

    group.finish();

    let mut group = c.benchmark_group("ID Generation");
    let generator = IdGenerator::new(IdGeneratorConfig::default()).unwrap();

    group.bench_function("next_id", |b| {
        b.iter(|| black_box(generator.next_id().unwrap()));
    });

    group.bench_function("decompose", |b| {
        let id = generator.next_id().unwrap();
        b.iter(|| black_box(generator.decompose(black_box(id))));
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
