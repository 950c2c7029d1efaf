//! Multi-threaded checks of the arena, chunked list and slot pool.
//!
//! Every test races several threads against one shared structure and
//! then verifies the result single-threaded after the scope joins.

use std::collections::HashSet;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thicket_arena::{ElemIndex, ListConfig, ListHeader, MemoryArena, PoolConfig, SlotPool};

const THREADS: u64 = 8;

#[test]
fn random_size_allocs_tile_the_arena() {
    let arena = MemoryArena::with_capacity(4 << 20);
    let mut regions: Vec<(u32, u32)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let arena = &arena;
                s.spawn(move || {
                    let mut rng = ChaCha8Rng::seed_from_u64(0xA11C ^ t);
                    (0..500)
                        .map(|_| {
                            let size = rng.next_u32() % 256;
                            (arena.alloc(size), size.next_multiple_of(MemoryArena::ALIGNMENT))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    regions.retain(|&(_, len)| len > 0);
    regions.sort_unstable();
    for pair in regions.windows(2) {
        assert!(pair[0].0 + pair[0].1 <= pair[1].0, "overlap: {pair:?}");
    }
    let total: u32 = regions.iter().map(|&(_, len)| len).sum();
    assert_eq!(arena.used_bytes(), total);
}

#[test]
fn concurrent_appends_form_a_bijection() {
    let per_thread = 2_000u32;
    let header = ListHeader::new(&ListConfig::new(4).with_chunking(4, 1024)).unwrap();
    let arena = MemoryArena::with_capacity(1 << 20);

    std::thread::scope(|s| {
        for t in 0..THREADS as u32 {
            let list = header.manager(&arena).typed::<u32>().unwrap();
            s.spawn(move || {
                for i in 0..per_thread {
                    list.append(&(t * per_thread + i));
                }
            });
        }
    });

    let list = header.manager(&arena).typed::<u32>().unwrap();
    let n = THREADS as u32 * per_thread;
    assert_eq!(list.num_active(), n);
    let seen: HashSet<u32> = (0..n).map(|i| list.get(i)).collect();
    assert_eq!(seen.len(), n as usize);
    assert!(seen.iter().all(|&v| v < n));

    // One arena allocation per chunk, never more.
    let chunks = n.div_ceil(header.elems_per_chunk());
    assert_eq!(header.published_chunks(), chunks as usize);
    assert_eq!(arena.used_bytes(), chunks * header.chunk_bytes());
}

#[test]
fn contended_first_chunk_is_allocated_once() {
    // Many threads append exactly once each, so all of them race on
    // chunk 0 at the same moment.
    for round in 0..50 {
        let header = ListHeader::new(&ListConfig::new(8).with_chunking(6, 4)).unwrap();
        let arena = MemoryArena::with_capacity(4096);
        let barrier = std::sync::Barrier::new(THREADS as usize);
        std::thread::scope(|s| {
            for _ in 0..THREADS {
                let list = header.manager(&arena);
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    list.append_slot();
                });
            }
        });
        assert_eq!(header.published_chunks(), 1, "round {round}");
        assert_eq!(arena.used_bytes(), header.chunk_bytes(), "round {round}");
    }
}

#[test]
fn concurrent_pool_allocations_are_unique() {
    let pool = SlotPool::new(&PoolConfig::new(16).with_chunking(3, 1024)).unwrap();
    let arena = MemoryArena::with_capacity(1 << 20);

    // Seed part of the free list so both paths of allocate() race.
    {
        let mgr = pool.manager(&arena);
        for _ in 0..64 {
            mgr.allocate();
        }
        let free = mgr.free_list().typed::<ElemIndex>().unwrap();
        for i in (0..64).step_by(2) {
            free.append(&ElemIndex::from_index(i));
        }
        mgr.reset_free_list_used();
    }

    let issued: Vec<ElemIndex> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let mgr = pool.manager(&arena);
                s.spawn(move || (0..200).map(|_| mgr.allocate()).collect::<Vec<_>>())
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<ElemIndex> = issued.iter().copied().collect();
    assert_eq!(unique.len(), issued.len());
    assert!(issued.iter().all(|idx| idx.is_valid()));
    for i in (0..64).step_by(2) {
        assert!(unique.contains(&ElemIndex::from_index(i)), "free entry {i} not reused");
    }
}
