//! Core types for the thicket sparse-structure runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the metadata consumed by the allocator and node crates: node
//! identifiers, node kinds and child layouts, per-axis bit extractors,
//! element coordinates, and the list-generation element descriptor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coords;
pub mod error;
pub mod id;
pub mod meta;

pub use coords::{AxisExtractor, ElementCoords, ListgenElement, NodeExtractors, MAX_NUM_INDICES};
pub use error::LayoutError;
pub use id::NodeId;
pub use meta::{NodeKind, NodeMeta};
