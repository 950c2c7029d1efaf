//! Lock-free generation-scoped allocation for thicket.
//!
//! Everything in this crate is shared by every thread working on one
//! generation and is mutated only through atomics: there are no locks,
//! no blocking waits and no per-allocation frees. A generation's
//! storage is discarded wholesale by the driver that created it.
//!
//! # Architecture
//!
//! ```text
//! MemoryArena (atomic bump cursor over a fixed word buffer)
//! └── ListHeader + ChunkedList (append-only, chunks allocated once)
//!     └── SlotPool + SlotPoolManager (data / free / recycled lists)
//! ```
//!
//! Chunk tables and pointer-node cells share one allocate-once
//! protocol: a cell moves `0 (unallocated) → 1 (allocating) → >1
//! (published)` and never goes back. The thread that wins the CAS from
//! 0 to 1 does the allocation; everyone else spins until publication.
//!
//! # Safety
//!
//! The arena is a slice of `AtomicU32`, so every access is a safe
//! atomic word operation. Out-of-capacity allocations and out-of-range
//! indices are caller-upheld preconditions: they are checked with
//! `debug_assert!` and otherwise surface as an index panic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod element;
pub mod error;
pub mod index;
pub mod list;
pub mod pool;

// Public re-exports for the primary API surface.
pub use arena::{Addr, MemoryArena, PtrOffset};
pub use config::{ArenaConfig, ListConfig, PoolConfig};
pub use element::Element;
pub use error::ArenaError;
pub use index::ElemIndex;
pub use list::{ChunkedList, ListHeader, ReservedElem, TypedList};
pub use pool::{SlotPool, SlotPoolManager};
