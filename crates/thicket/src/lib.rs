//! Thicket: lock-free storage for multi-level sparse trees.
//!
//! This is the facade crate that re-exports the public API of the
//! Thicket sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use thicket::prelude::*;
//!
//! let arena = MemoryArena::new(&ArenaConfig::new(1 << 16)).unwrap();
//! let slots = SlotPool::new(&PoolConfig::new(16)).unwrap();
//! let pool = slots.manager(&arena);
//! let ambient = pool.allocate();
//!
//! // A pointer node with four lazily allocated children.
//! let meta = NodeMeta::new(NodeKind::Pointer, 4, 16);
//! let addr = arena.to_addr(arena.alloc(meta.node_bytes()));
//! let node = PointerNode::new(addr, pool, ambient);
//!
//! node.activate(2);
//! node.activate(2);
//! assert!(node.is_active(2));
//! assert!(!node.is_active(0));
//! // The ambient slot plus one child.
//! assert_eq!(pool.data_list().num_active(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `thicket-core` | Node ids, metadata, coordinates, layout errors |
//! | [`arena`] | `thicket-arena` | Bump arena, chunked lists, slot pools |
//! | [`node`] | `thicket-node` | Sparse node kinds, layout table, coordinate refinement |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Node ids, kind-erased metadata and coordinate types (`thicket-core`).
pub use thicket_core as types;

/// Bump arena, chunked lists and slot pools (`thicket-arena`).
///
/// [`arena::MemoryArena`] owns every byte; [`arena::ChunkedList`] and
/// [`arena::SlotPoolManager`] are cheap views over it.
pub use thicket_arena as arena;

/// Sparse node representations (`thicket-node`).
///
/// Concrete kinds plus the [`node::SparseNode`] enum and the
/// [`node::NodeLayout`] table built before a generation starts.
pub use thicket_node as node;

/// Common imports for typical Thicket usage.
///
/// ```rust
/// use thicket::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use thicket_core::{
        AxisExtractor, ElementCoords, ListgenElement, NodeExtractors, NodeId, NodeKind, NodeMeta,
    };

    // Errors
    pub use thicket_arena::ArenaError;
    pub use thicket_core::LayoutError;

    // Storage
    pub use thicket_arena::{
        Addr, ArenaConfig, ChunkedList, ElemIndex, Element, ListConfig, ListHeader, MemoryArena,
        PoolConfig, SlotPool, SlotPoolManager, TypedList,
    };

    // Nodes
    pub use thicket_node::{
        listgen_child, refine_coordinates, resolve_address, BitmaskedNode, DenseNode,
        DynamicNode, NodeLayout, PointerNode, RootNode, SparseNode,
    };
}
