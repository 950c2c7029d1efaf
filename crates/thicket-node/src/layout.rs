//! Per-generation node layout table.
//!
//! The [`NodeLayout`] maps each [`NodeId`] to the metadata the layout
//! compiler produced for it: kind and child layout, per-axis
//! extractors, and its place in the tree. It is built once, before
//! threads start, and is read-only afterwards. It uses `IndexMap` so
//! iteration follows registration order, which is parent-before-child.

use indexmap::IndexMap;
use smallvec::SmallVec;
use thicket_arena::{Addr, MemoryArena};
use thicket_core::{LayoutError, NodeExtractors, NodeId, NodeKind, NodeMeta};
use tracing::debug;

use crate::rep;

/// One node's entry in the layout table.
#[derive(Clone, Debug)]
pub struct NodeEntry {
    /// Kind and child layout.
    pub meta: NodeMeta,
    /// Bit layout mapping a child index to child coordinates.
    pub extractors: NodeExtractors,
    /// The parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Child nodes in registration order.
    pub children: SmallVec<[NodeId; 4]>,
}

/// Immutable node metadata for one generation.
#[derive(Clone, Debug, Default)]
pub struct NodeLayout {
    entries: IndexMap<NodeId, NodeEntry>,
}

impl NodeLayout {
    /// Start building a layout.
    pub fn builder() -> NodeLayoutBuilder {
        NodeLayoutBuilder::default()
    }

    /// Entry for `id`.
    pub fn get(&self, id: NodeId) -> Option<&NodeEntry> {
        self.entries.get(&id)
    }

    /// Metadata for `id`.
    pub fn meta(&self, id: NodeId) -> Option<&NodeMeta> {
        self.get(id).map(|e| &e.meta)
    }

    /// Extractors for `id`.
    pub fn extractors(&self, id: NodeId) -> Option<&NodeExtractors> {
        self.get(id).map(|e| &e.extractors)
    }

    /// Parent of `id`, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Children of `id`. Empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |e| e.children.as_slice())
    }

    /// The root node, if one was registered.
    pub fn root(&self) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(_, e)| e.parent.is_none())
            .map(|(&id, _)| id)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeEntry)> {
        self.entries.iter()
    }

    /// Activity of child `i` of node `id` stored at `addr`.
    ///
    /// `None` if `id` is unknown or is a pointer node; see
    /// [`rep::is_active`].
    pub fn is_active(&self, arena: &MemoryArena, id: NodeId, addr: Addr, i: u32) -> Option<bool> {
        let meta = self.meta(id)?;
        rep::is_active(arena, meta, addr, i)
    }
}

/// Builder for [`NodeLayout`].
///
/// Nodes must be registered parent first.
#[derive(Debug, Default)]
pub struct NodeLayoutBuilder {
    entries: IndexMap<NodeId, NodeEntry>,
}

impl NodeLayoutBuilder {
    /// Register the root node.
    pub fn add_root(mut self, id: NodeId, meta: NodeMeta) -> Result<Self, LayoutError> {
        if self.entries.values().any(|e| e.parent.is_none()) {
            return Err(LayoutError::InvalidMeta {
                node: id,
                reason: "layout already has a root".to_string(),
            });
        }
        self.insert(id, meta, NodeExtractors::IDENTITY, None)?;
        Ok(self)
    }

    /// Register `id` as a child of `parent`.
    pub fn add_child(
        mut self,
        parent: NodeId,
        id: NodeId,
        meta: NodeMeta,
        extractors: NodeExtractors,
    ) -> Result<Self, LayoutError> {
        if meta.kind == NodeKind::Root {
            return Err(LayoutError::InvalidMeta {
                node: id,
                reason: "root kind used for a non-root node".to_string(),
            });
        }
        if !self.entries.contains_key(&parent) {
            return Err(LayoutError::UnknownParent { node: id, parent });
        }
        self.insert(id, meta, extractors, Some(parent))?;
        if let Some(p) = self.entries.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(self)
    }

    /// Finish the layout.
    pub fn build(self) -> NodeLayout {
        debug!(nodes = self.entries.len(), "node layout built");
        NodeLayout {
            entries: self.entries,
        }
    }

    fn insert(
        &mut self,
        id: NodeId,
        meta: NodeMeta,
        extractors: NodeExtractors,
        parent: Option<NodeId>,
    ) -> Result<(), LayoutError> {
        if self.entries.contains_key(&id) {
            return Err(LayoutError::DuplicateNode { node: id });
        }
        meta.validate(id)?;
        self.entries.insert(
            id,
            NodeEntry {
                meta,
                extractors,
                parent,
                children: SmallVec::new(),
            },
        );
        Ok(())
    }
}
