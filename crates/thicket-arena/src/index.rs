//! Opaque slot indices.
//!
//! An [`ElemIndex`] names one slot in a pool's data list. Its raw form
//! is offset by two so that the raw values 0 and 1 stay free for the
//! allocate-once protocol: 0 is "no slot", 1 is "slot being allocated".

use std::fmt;

/// Tagged index of a slot in a [`SlotPool`](crate::pool::SlotPool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElemIndex(u32);

impl ElemIndex {
    const INDEX_OFFSET: u32 = 2;

    /// Raw value of a cell that holds no slot.
    pub const UNALLOCATED_RAW: u32 = 0;

    /// Raw value of a cell whose slot is being allocated by another thread.
    pub const ALLOCATING_RAW: u32 = 1;

    /// The index that refers to no slot.
    pub const INVALID: Self = Self(Self::UNALLOCATED_RAW);

    /// Wrap a data-list position.
    #[inline]
    pub fn from_index(index: u32) -> Self {
        Self(index + Self::INDEX_OFFSET)
    }

    /// Reinterpret a raw cell value.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw cell value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Position in the data list. Only meaningful for valid indices.
    #[inline]
    pub fn index(self) -> u32 {
        debug_assert!(self.is_valid(), "index() on invalid ElemIndex({})", self.0);
        self.0 - Self::INDEX_OFFSET
    }

    /// Whether this refers to an actual slot.
    #[inline]
    pub fn is_valid(self) -> bool {
        Self::is_valid_raw(self.0)
    }

    /// Whether a raw cell value refers to an actual slot.
    #[inline]
    pub fn is_valid_raw(raw: u32) -> bool {
        raw > Self::ALLOCATING_RAW
    }
}

impl Default for ElemIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ElemIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.index())
        } else {
            f.write_str("#invalid")
        }
    }
}
