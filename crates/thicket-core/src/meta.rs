//! Kind-erased node metadata.
//!
//! A [`NodeMeta`] describes the children layout of one sparse node
//! without naming its concrete representation. The layout compiler
//! emits one per node; the runtime treats it as immutable input for
//! the lifetime of a generation.

use std::fmt;

use crate::error::LayoutError;
use crate::id::NodeId;

/// How a node tracks which of its children are materialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The tree root. Behaves exactly like [`NodeKind::Dense`].
    Root,
    /// Children are preallocated contiguously and always active.
    Dense,
    /// One activation bit per child, stored after the children.
    Bitmasked,
    /// A prefix of children is active, tracked by one counter stored
    /// after the children.
    Dynamic,
    /// Each child cell holds a slot-pool index, allocated lazily.
    Pointer,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "root",
            Self::Dense => "dense",
            Self::Bitmasked => "bitmasked",
            Self::Dynamic => "dynamic",
            Self::Pointer => "pointer",
        };
        f.write_str(name)
    }
}

/// Children layout of a single sparse node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeMeta {
    /// Representation backing this node.
    pub kind: NodeKind,
    /// Number of child slots.
    pub num_slots: u32,
    /// Size of one child cell in bytes.
    ///
    /// For pointer nodes this is the stride of the slot pool the
    /// children are allocated from; the node itself stores one
    /// [`NodeMeta::POINTER_CELL_BYTES`] cell per child.
    pub element_stride: u32,
}

impl NodeMeta {
    /// Bits held by one activation mask word.
    pub const BITS_PER_MASK: u32 = u32::BITS;

    /// Bytes of one pointer-node child cell (a pool index).
    pub const POINTER_CELL_BYTES: u32 = 4;

    /// Create metadata for a node of the given kind.
    pub fn new(kind: NodeKind, num_slots: u32, element_stride: u32) -> Self {
        Self {
            kind,
            num_slots,
            element_stride,
        }
    }

    /// Byte offset, relative to the node address, at which activation
    /// metadata (bitmask words or the dynamic counter) begins.
    pub fn meta_offset(&self) -> u32 {
        self.num_slots * self.element_stride
    }

    /// Number of 32-bit mask words a bitmasked node of this size needs.
    pub fn mask_words(&self) -> u32 {
        self.num_slots.div_ceil(Self::BITS_PER_MASK)
    }

    /// Total bytes one node of this layout occupies.
    pub fn node_bytes(&self) -> u32 {
        match self.kind {
            NodeKind::Root | NodeKind::Dense => self.meta_offset(),
            NodeKind::Bitmasked => self.meta_offset() + self.mask_words() * 4,
            NodeKind::Dynamic => self.meta_offset() + 4,
            NodeKind::Pointer => self.num_slots * Self::POINTER_CELL_BYTES,
        }
    }

    /// Check structural invariants the runtime relies on.
    ///
    /// Child cells are accessed with 32-bit atomics, so strides must be
    /// a non-zero multiple of four bytes. Only a root may be empty.
    pub fn validate(&self, node: NodeId) -> Result<(), LayoutError> {
        if self.num_slots == 0 && self.kind != NodeKind::Root {
            return Err(LayoutError::InvalidMeta {
                node,
                reason: format!("{} node has no child slots", self.kind),
            });
        }
        if self.num_slots > 0 && (self.element_stride == 0 || self.element_stride % 4 != 0) {
            return Err(LayoutError::InvalidMeta {
                node,
                reason: format!(
                    "element_stride must be a non-zero multiple of 4 (got {})",
                    self.element_stride
                ),
            });
        }
        Ok(())
    }
}
