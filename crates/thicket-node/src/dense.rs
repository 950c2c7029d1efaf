//! Dense nodes: every child preallocated, always active.

use thicket_arena::Addr;

/// A node whose children are contiguous and permanently active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DenseNode {
    addr: Addr,
}

/// The root is laid out exactly like a dense node.
pub type RootNode = DenseNode;

impl DenseNode {
    /// Wrap the node stored at `addr`.
    pub fn new(addr: Addr) -> Self {
        Self { addr }
    }

    /// Address of the node, which is also the address of child 0.
    #[inline]
    pub fn addr(&self) -> Addr {
        self.addr
    }

    /// Address of child `i` for children `element_stride` bytes wide.
    #[inline]
    pub fn child_addr(&self, i: u32, element_stride: u32) -> Addr {
        self.addr.offset(i * element_stride)
    }

    /// Always true.
    #[inline]
    pub fn is_active(&self, _i: u32) -> bool {
        true
    }

    /// No-op.
    #[inline]
    pub fn activate(&self, _i: u32) {}

    /// No-op.
    #[inline]
    pub fn deactivate(&self, _i: u32) {}
}
