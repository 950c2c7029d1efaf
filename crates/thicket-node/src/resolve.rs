//! Address resolution for list-generation elements.

use thicket_arena::Addr;
use thicket_core::{ListgenElement, NodeExtractors};

use crate::refine::refine_coordinates;

/// Address of the cell described by `elem` in the tree rooted at `root`.
///
/// The element's offset is computed by the traversal that produced it;
/// this only applies it.
#[inline]
pub fn resolve_address(elem: &ListgenElement, root: Addr) -> Addr {
    root.offset(elem.mem_offset)
}

/// The element for child `l` of `parent`, whose cell lies
/// `child_offset` bytes past the parent's.
pub fn listgen_child(
    parent: &ListgenElement,
    extractors: &NodeExtractors,
    l: u32,
    child_offset: u32,
) -> ListgenElement {
    ListgenElement::new(
        refine_coordinates(&parent.coords, extractors, l),
        parent.mem_offset + child_offset,
    )
}
