//! Enum dispatch over the four node representations.

use thicket_arena::{Addr, MemoryArena};
use thicket_core::{NodeKind, NodeMeta};

use crate::bitmasked::BitmaskedNode;
use crate::dense::DenseNode;
use crate::dynamic::DynamicNode;
use crate::pointer::PointerNode;

/// Any sparse node, with its kind known at runtime.
#[derive(Clone, Copy)]
pub enum SparseNode<'a> {
    /// Dense or root node.
    Dense(DenseNode),
    /// Bitmasked node.
    Bitmasked(BitmaskedNode<'a>),
    /// Dynamic node.
    Dynamic(DynamicNode<'a>),
    /// Pointer node.
    Pointer(PointerNode<'a>),
}

impl<'a> SparseNode<'a> {
    /// Bind a non-pointer node from kind-erased metadata.
    ///
    /// Returns `None` for [`NodeKind::Pointer`]: a pointer node also
    /// needs its slot pool and ambient slot, which `NodeMeta` does not
    /// carry. Build those with [`PointerNode::new`] instead.
    pub fn from_meta(arena: &'a MemoryArena, meta: &NodeMeta, addr: Addr) -> Option<Self> {
        match meta.kind {
            NodeKind::Root | NodeKind::Dense => Some(Self::Dense(DenseNode::new(addr))),
            NodeKind::Bitmasked => {
                Some(Self::Bitmasked(BitmaskedNode::from_meta(arena, addr, meta)))
            }
            NodeKind::Dynamic => Some(Self::Dynamic(DynamicNode::from_meta(arena, addr, meta))),
            NodeKind::Pointer => None,
        }
    }

    /// The representation's kind. Roots report [`NodeKind::Dense`].
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Dense(_) => NodeKind::Dense,
            Self::Bitmasked(_) => NodeKind::Bitmasked,
            Self::Dynamic(_) => NodeKind::Dynamic,
            Self::Pointer(_) => NodeKind::Pointer,
        }
    }

    /// Address of the node.
    pub fn addr(&self) -> Addr {
        match self {
            Self::Dense(n) => n.addr(),
            Self::Bitmasked(n) => n.addr(),
            Self::Dynamic(n) => n.addr(),
            Self::Pointer(n) => n.addr(),
        }
    }

    /// Whether child `i` is active.
    pub fn is_active(&self, i: u32) -> bool {
        match self {
            Self::Dense(n) => n.is_active(i),
            Self::Bitmasked(n) => n.is_active(i),
            Self::Dynamic(n) => n.is_active(i),
            Self::Pointer(n) => n.is_active(i),
        }
    }

    /// Activate child `i`.
    pub fn activate(&self, i: u32) {
        match self {
            Self::Dense(n) => n.activate(i),
            Self::Bitmasked(n) => n.activate(i),
            Self::Dynamic(n) => n.activate(i),
            Self::Pointer(n) => n.activate(i),
        }
    }

    /// Deactivate child `i`.
    ///
    /// On a dynamic node this deactivates every child, whatever `i` is.
    pub fn deactivate(&self, i: u32) {
        match self {
            Self::Dense(n) => n.deactivate(i),
            Self::Bitmasked(n) => n.deactivate(i),
            Self::Dynamic(n) => n.deactivate(),
            Self::Pointer(n) => n.deactivate(i),
        }
    }
}

impl<'a> From<DenseNode> for SparseNode<'a> {
    fn from(n: DenseNode) -> Self {
        Self::Dense(n)
    }
}

impl<'a> From<BitmaskedNode<'a>> for SparseNode<'a> {
    fn from(n: BitmaskedNode<'a>) -> Self {
        Self::Bitmasked(n)
    }
}

impl<'a> From<DynamicNode<'a>> for SparseNode<'a> {
    fn from(n: DynamicNode<'a>) -> Self {
        Self::Dynamic(n)
    }
}

impl<'a> From<PointerNode<'a>> for SparseNode<'a> {
    fn from(n: PointerNode<'a>) -> Self {
        Self::Pointer(n)
    }
}

/// Activity of child `i` of the node at `addr`, knowing only its metadata.
///
/// Used where the concrete node type is not statically known, such as
/// element list generation. Pointer nodes are not handled: the answer
/// is `None`, and callers that need pointer semantics must hold a
/// [`PointerNode`].
pub fn is_active(arena: &MemoryArena, meta: &NodeMeta, addr: Addr, i: u32) -> Option<bool> {
    SparseNode::from_meta(arena, meta, addr).map(|node| node.is_active(i))
}
