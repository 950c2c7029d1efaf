//! Strongly-typed node identifiers.

use std::fmt;

/// Identifies a sparse node within a generation's layout.
///
/// Ids are assigned by the layout compiler and are opaque to this
/// runtime. `NodeId(0)` is conventionally the root, but nothing here
/// relies on that.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
