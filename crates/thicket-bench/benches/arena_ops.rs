//! Criterion micro-benchmarks for the bump arena, chunked lists and slot pools.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use thicket_arena::{ListConfig, ListHeader, MemoryArena, PoolConfig, SlotPool};
use thicket_bench::reference_profile;
use thicket_test_utils::collect_recycled;

/// Benchmark: 10K bump allocations of mixed sizes.
fn bench_arena_alloc_10k(c: &mut Criterion) {
    c.bench_function("arena_alloc_10k", |b| {
        b.iter(|| {
            let arena = MemoryArena::with_capacity(1 << 20);
            for i in 0..10_000u32 {
                black_box(arena.alloc(i % 64));
            }
        });
    });
}

/// Benchmark: append 10K u32 elements, chunks allocated on the way.
fn bench_list_append_10k(c: &mut Criterion) {
    let config = ListConfig::new(4).with_chunking(10, 16);
    c.bench_function("list_append_10k", |b| {
        b.iter(|| {
            let arena = MemoryArena::with_capacity(1 << 20);
            let header = ListHeader::new(&config).unwrap();
            let list = header.manager(&arena).typed::<u32>().unwrap();
            for i in 0..10_000u32 {
                list.append(&i);
            }
            black_box(list.num_active());
        });
    });
}

/// Benchmark: random-order reads over a filled typed list.
fn bench_list_get_10k(c: &mut Criterion) {
    let arena = MemoryArena::with_capacity(1 << 20);
    let header = ListHeader::new(&ListConfig::new(8).with_chunking(10, 16)).unwrap();
    let list = header.manager(&arena).typed::<[u32; 2]>().unwrap();
    for i in 0..10_000u32 {
        list.append(&[i, !i]);
    }

    c.bench_function("list_get_10k", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for i in 0..10_000u32 {
                let [lo, hi] = list.get((i * 7919) % 10_000);
                acc = acc.wrapping_add(lo ^ hi);
            }
            black_box(acc);
        });
    });
}

/// Benchmark: allocate a generation's worth of slots, half of them recycled.
fn bench_pool_generation(c: &mut Criterion) {
    let profile = reference_profile();
    let arena = MemoryArena::new(&profile.arena).unwrap();
    let slots = SlotPool::new(&PoolConfig::new(16).with_chunking(10, 16)).unwrap();
    let pool = slots.manager(&arena);
    let n = profile.total_children();

    // Warm up so later generations only reuse slots.
    let warm: Vec<_> = (0..n).map(|_| pool.allocate()).collect();
    for idx in warm.into_iter().step_by(2) {
        pool.recycle(idx);
    }
    collect_recycled(pool);

    c.bench_function("pool_generation_8k", |b| {
        b.iter(|| {
            for _ in 0..n / 2 {
                let idx = pool.allocate();
                pool.recycle(black_box(idx));
            }
            collect_recycled(pool);
        });
    });
}

criterion_group!(
    benches,
    bench_arena_alloc_10k,
    bench_list_append_10k,
    bench_list_get_10k,
    bench_pool_generation
);
criterion_main!(benches);
