//! Stress Tests for Concurrent Access
//!
//! These tests verify thread safety and correctness under high contention.

use flakecache::config::{BoundedCacheConfig, EvictionPolicy, IdGeneratorConfig};
use flakecache::metrics::CacheMetrics;
use flakecache::{BoundedCache, IdGenerator, UnboundedCache};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 10_000;

fn lru(capacity: usize) -> BoundedCache<usize, usize> {
    BoundedCache::init(
        BoundedCacheConfig::new(capacity).with_policy(EvictionPolicy::Lru),
        None,
    )
}

/// Test high contention with many threads hammering the same keys
#[test]
fn stress_fifo_high_contention() {
    let cache: Arc<BoundedCache<usize, usize>> = Arc::new(BoundedCache::fifo(100));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = i % 10; // Only 10 keys for high contention
                if t % 2 == 0 {
                    cache.put(key, t * OPS_PER_THREAD + i);
                } else {
                    let _ = cache.get(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 10);
}

/// Test capacity limits under concurrent inserts of distinct keys
#[test]
fn stress_capacity_limits() {
    for cache in [BoundedCache::fifo(100), lru(100)] {
        let cache = Arc::new(cache);
        let mut handles = Vec::new();
        for t in 0..NUM_THREADS {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..OPS_PER_THREAD / 10 {
                    cache.put(t * OPS_PER_THREAD + i, i);
                    assert!(cache.len() <= 100);
                }
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(cache.len(), 100);
        let metrics = cache.metrics();
        assert_eq!(
            metrics["insertions"] - metrics["evictions"],
            100.0,
            "{}",
            cache.algorithm_name()
        );
    }
}

/// Test LRU with readers promoting while writers evict
#[test]
fn stress_lru_mixed_reads_and_writes() {
    let cache = Arc::new(lru(64));
    for key in 0..64 {
        cache.put(key, key);
    }

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD / 4 {
                let key = (t * 31 + i) % 256;
                match i % 4 {
                    0 => {
                        cache.put(key, key);
                    }
                    1 => {
                        cache.remove(&key);
                    }
                    _ => {
                        if let Some(value) = cache.get(&key) {
                            assert_eq!(value, key);
                        }
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 64);
    assert!(cache.keys().len() == cache.len());
}

/// Readers must never observe a half-written value
#[test]
fn stress_values_never_torn() {
    let cache: Arc<BoundedCache<usize, (usize, usize)>> = Arc::new(BoundedCache::fifo(8));
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..OPS_PER_THREAD {
                let key = i % 12;
                if t % 4 == 0 {
                    let stamp = t * OPS_PER_THREAD + i;
                    cache.put(key, (stamp, stamp.wrapping_mul(3)));
                } else if let Some((a, b)) = cache.get(&key) {
                    assert_eq!(b, a.wrapping_mul(3));
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

/// Concurrent memoisation converges on a single value per key
#[test]
fn stress_get_or_insert_with_agrees() {
    let cache: Arc<BoundedCache<usize, usize>> = Arc::new(BoundedCache::fifo(1_000));
    let builds = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let mut handles = Vec::new();
    for t in 0..8 {
        let cache = Arc::clone(&cache);
        let builds = Arc::clone(&builds);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            (0..100)
                .map(|key| {
                    cache.get_or_insert_with(key, || {
                        builds.fetch_add(1, Ordering::Relaxed);
                        key * 1_000 + t
                    })
                })
                .collect::<Vec<_>>()
        }));
    }

    let results: Vec<Vec<usize>> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    for key in 0..100 {
        let stored = cache.get(&key).unwrap();
        for seen in &results {
            assert_eq!(seen[key], stored);
        }
    }
    assert!(builds.load(Ordering::Relaxed) >= 100);
}

/// Unbounded cache under mixed load
#[test]
fn stress_unbounded_cache() {
    let cache: Arc<UnboundedCache<usize, usize>> = Arc::new(UnboundedCache::new());

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1_000 {
                cache.put(t * 1_000 + i, i);
                assert_eq!(cache.get(&(t * 1_000 + i)), Some(i));
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), NUM_THREADS * 1_000);
}

/// IDs drawn from many threads never collide
#[test]
fn stress_id_generator_uniqueness() {
    let generator = Arc::new(IdGenerator::new(IdGeneratorConfig::default()).unwrap());
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let mut handles = Vec::new();
    for _ in 0..NUM_THREADS {
        let generator = Arc::clone(&generator);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            (0..OPS_PER_THREAD)
                .map(|_| generator.next_id().expect("clock should not roll back"))
                .collect::<Vec<_>>()
        }));
    }

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.join().expect("Thread panicked") {
            assert!(all.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(all.len(), NUM_THREADS * OPS_PER_THREAD);
}
