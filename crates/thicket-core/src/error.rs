//! Layout validation errors.

use std::error::Error;
use std::fmt;

use crate::id::NodeId;

/// Errors raised while assembling a generation's node layout.
///
/// Only construction-time validation reports errors; the runtime hot
/// path treats malformed metadata as a caller-upheld precondition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A node id was registered twice.
    DuplicateNode {
        /// The repeated id.
        node: NodeId,
    },
    /// A child referenced a parent that is not registered.
    UnknownParent {
        /// The child being added.
        node: NodeId,
        /// The missing parent.
        parent: NodeId,
    },
    /// Node metadata violates a structural invariant.
    InvalidMeta {
        /// The offending node.
        node: NodeId,
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode { node } => write!(f, "node {node} registered twice"),
            Self::UnknownParent { node, parent } => {
                write!(f, "node {node} references unknown parent {parent}")
            }
            Self::InvalidMeta { node, reason } => {
                write!(f, "invalid metadata for node {node}: {reason}")
            }
        }
    }
}

impl Error for LayoutError {}
