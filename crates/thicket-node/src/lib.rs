//! Sparse node representations for thicket trees.
//!
//! A sparse node is one level of a multi-level structure in which not
//! every potential child is materialized. Four representations track
//! materialization differently:
//!
//! | Kind | Storage | Activation |
//! |------|---------|------------|
//! | [`DenseNode`] (and root) | children only | always active |
//! | [`BitmaskedNode`] | children + one bit per child | atomic OR / AND |
//! | [`DynamicNode`] | children + one counter | prefix, atomic max |
//! | [`PointerNode`] | one pool index per child | allocate-once from a [`SlotPool`] |
//!
//! [`SparseNode`] wraps them in one enum. Code that only has kind-erased
//! [`NodeMeta`](thicket_core::NodeMeta) uses [`is_active`], which
//! returns `None` for pointer nodes.
//!
//! [`refine_coordinates`] and [`resolve_address`] are the pure helpers
//! traversal code builds on.
//!
//! [`SlotPool`]: thicket_arena::SlotPool

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bitmasked;
pub mod dense;
pub mod dynamic;
pub mod layout;
pub mod pointer;
pub mod refine;
pub mod rep;
pub mod resolve;

pub use bitmasked::BitmaskedNode;
pub use dense::{DenseNode, RootNode};
pub use dynamic::DynamicNode;
pub use layout::{NodeEntry, NodeLayout, NodeLayoutBuilder};
pub use pointer::PointerNode;
pub use refine::refine_coordinates;
pub use rep::{is_active, SparseNode};
pub use resolve::{listgen_child, resolve_address};
