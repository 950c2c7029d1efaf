//! Element coordinates, per-axis bit extractors, and list-generation
//! element descriptors.
//!
//! Coordinates are packed bit fields: each level of the tree owns a
//! contiguous run of bits on every axis. An [`AxisExtractor`] says where
//! that run lives, both in the per-axis coordinate and in the node's
//! linearized child index.

/// Maximum number of axes a coordinate can carry.
pub const MAX_NUM_INDICES: usize = 8;

/// Per-axis integer coordinates of one element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ElementCoords {
    /// Coordinate on each axis. Unused axes stay zero.
    pub at: [i32; MAX_NUM_INDICES],
}

impl ElementCoords {
    /// The all-zero coordinate.
    pub const ORIGIN: Self = Self {
        at: [0; MAX_NUM_INDICES],
    };

    /// Build coordinates from a prefix of axes; remaining axes are zero.
    ///
    /// # Panics
    ///
    /// Panics if `axes` is longer than [`MAX_NUM_INDICES`].
    pub fn from_axes(axes: &[i32]) -> Self {
        assert!(
            axes.len() <= MAX_NUM_INDICES,
            "{} axes exceed MAX_NUM_INDICES ({MAX_NUM_INDICES})",
            axes.len()
        );
        let mut at = [0; MAX_NUM_INDICES];
        at[..axes.len()].copy_from_slice(axes);
        Self { at }
    }
}

/// Bit layout of one axis at one tree level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AxisExtractor {
    /// First bit of this level's run within the axis coordinate.
    pub start: u32,
    /// Width of the run. Zero means the level does not split this axis.
    pub num_bits: u32,
    /// First bit of this axis' run within the linearized child index.
    pub acc_offset: u32,
}

impl AxisExtractor {
    /// Create an extractor.
    pub fn new(start: u32, num_bits: u32, acc_offset: u32) -> Self {
        Self {
            start,
            num_bits,
            acc_offset,
        }
    }
}

/// The extractors for every axis of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeExtractors {
    /// One extractor per axis, indexed like [`ElementCoords::at`].
    pub extractors: [AxisExtractor; MAX_NUM_INDICES],
}

impl NodeExtractors {
    /// Extractors that leave every axis untouched.
    pub const IDENTITY: Self = Self {
        extractors: [AxisExtractor {
            start: 0,
            num_bits: 0,
            acc_offset: 0,
        }; MAX_NUM_INDICES],
    };

    /// Set the extractor for one axis, builder style.
    pub fn with_axis(mut self, axis: usize, extractor: AxisExtractor) -> Self {
        self.extractors[axis] = extractor;
        self
    }
}

/// One element produced by list generation: where it sits in the
/// coordinate space and where its cell lives relative to the root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ListgenElement {
    /// Coordinates of the element.
    pub coords: ElementCoords,
    /// Byte offset of the element's cell from the root node.
    pub mem_offset: u32,
}

impl ListgenElement {
    /// Create a descriptor.
    pub fn new(coords: ElementCoords, mem_offset: u32) -> Self {
        Self { coords, mem_offset }
    }
}
