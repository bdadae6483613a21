//! # Memory Primitive Benchmarks
//!
//! The allocators sit under every frame of the engine, so their per-call
//! cost must stay flat:
//! - Region allocate/deallocate: O(free blocks), no heap traffic at steady
//!   state
//! - Pool allocate/free: O(1) plus one mutex acquisition
//!
//! Run with: `cargo bench --package typhon_memory`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use typhon_memory::{ObjectPool, RegionAllocator};

/// Working span for region benchmarks.
const REGION_SPAN: u64 = 64 * 1024 * 1024;

/// Slot count for pool benchmarks.
const POOL_CAPACITY: usize = 16_384;

/// A particle-sized payload, the pool's typical customer.
#[derive(Default)]
struct Particle {
    position: [f32; 3],
    velocity: [f32; 3],
    life: f32,
}

/// Benchmark: one allocate/deallocate round trip on a pristine span.
fn bench_region_round_trip(c: &mut Criterion) {
    let mut region = RegionAllocator::new(REGION_SPAN);

    c.bench_function("region_round_trip", |b| {
        b.iter(|| {
            let offset = region.allocate(black_box(4096), black_box(256)).unwrap();
            region.deallocate(offset, 4096);
            offset
        });
    });
}

/// Benchmark: batch churn at increasing outstanding-allocation counts.
///
/// First-fit cost grows with free-list length; this tracks how the scan
/// behaves once the span is carved up.
fn bench_region_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_churn");

    for outstanding in [64, 512, 4_096] {
        group.bench_with_input(
            BenchmarkId::from_parameter(outstanding),
            &outstanding,
            |b, &outstanding| {
                b.iter(|| {
                    let mut region = RegionAllocator::new(REGION_SPAN);
                    let mut offsets = Vec::with_capacity(outstanding);
                    for _ in 0..outstanding {
                        offsets.push(region.allocate(1024, 64).unwrap());
                    }
                    // Free every other range first to force fragmentation,
                    // then drain the rest through the coalescing path.
                    for chunk in offsets.chunks(2) {
                        region.deallocate(chunk[0], 1024);
                    }
                    for chunk in offsets.chunks(2) {
                        if let [_, second] = chunk {
                            region.deallocate(*second, 1024);
                        }
                    }
                    region.available()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: pool allocate/free cycle at particle payload size.
fn bench_pool_cycle(c: &mut Criterion) {
    let pool: ObjectPool<Particle> = ObjectPool::with_capacity(POOL_CAPACITY);

    c.bench_function("pool_allocate_free", |b| {
        b.iter(|| {
            let handle = pool.allocate().unwrap();
            pool.free(black_box(handle))
        });
    });
}

/// Benchmark: validated access through a live handle.
fn bench_pool_access(c: &mut Criterion) {
    let pool: ObjectPool<Particle> = ObjectPool::with_capacity(POOL_CAPACITY);
    let handle = pool.allocate().unwrap();

    c.bench_function("pool_get", |b| {
        b.iter(|| {
            let mut particle = pool.get(black_box(handle)).unwrap();
            particle.life += 0.016;
            particle.life
        });
    });
}

criterion_group!(
    benches,
    bench_region_round_trip,
    bench_region_churn,
    bench_pool_cycle,
    bench_pool_access
);
criterion_main!(benches);
