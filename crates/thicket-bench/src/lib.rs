//! Benchmark profiles for the Thicket sparse tree runtime.
//!
//! - [`reference_profile`]: 1K pointer nodes of 8 children each.
//! - [`stress_profile`]: 16K pointer nodes, chunk tables near capacity.
//! - [`activation_order`]: deterministic child indices to activate.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use thicket_arena::{ArenaConfig, ArenaError, PoolConfig};
use thicket_core::{NodeKind, NodeMeta};

/// Sizes for one benchmarked generation.
#[derive(Clone, Debug)]
pub struct BenchProfile {
    /// Backing arena.
    pub arena: ArenaConfig,
    /// Slot pool the pointer children come from.
    pub pool: PoolConfig,
    /// Number of pointer nodes.
    pub nodes: u32,
    /// Layout shared by every pointer node.
    pub node_meta: NodeMeta,
}

impl BenchProfile {
    /// Check both configs.
    pub fn validate(&self) -> Result<(), ArenaError> {
        self.arena.validate()?;
        self.pool.data_list().validate()?;
        self.pool.index_list().validate()
    }

    /// Total children across all nodes.
    pub fn total_children(&self) -> u32 {
        self.nodes * self.node_meta.num_slots
    }
}

/// 1K pointer nodes with 8 children of 16 bytes.
pub fn reference_profile() -> BenchProfile {
    BenchProfile {
        arena: ArenaConfig::new(16 << 20),
        pool: PoolConfig::new(16).with_chunking(10, 64),
        nodes: 1024,
        node_meta: NodeMeta::new(NodeKind::Pointer, 8, 16),
    }
}

/// 16K pointer nodes with 8 children of 16 bytes.
///
/// Fills 128 of 256 data chunks, so most appends hit a published chunk.
pub fn stress_profile() -> BenchProfile {
    BenchProfile {
        arena: ArenaConfig::new(64 << 20),
        pool: PoolConfig::new(16).with_chunking(10, 256),
        nodes: 16 * 1024,
        node_meta: NodeMeta::new(NodeKind::Pointer, 8, 16),
    }
}

/// `n` child indices below `bound`, scrambled by `seed`.
///
/// Repeats are expected, which exercises the already-active fast path.
pub fn activation_order(n: usize, bound: u32, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % u64::from(bound)) as u32
        })
        .collect()
}
