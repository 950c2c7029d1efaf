//! Fixed-layout element encoding for chunked lists.
//!
//! Lists store elements as runs of 32-bit words. [`Element`] is the
//! contract a type signs to be stored there: a fixed word count and a
//! lossless conversion to and from those words. There is no runtime
//! type tag; [`ChunkedList::typed`](crate::list::ChunkedList::typed)
//! checks the word count against the list's stride once, at view
//! construction.

use thicket_core::{ElementCoords, ListgenElement, MAX_NUM_INDICES};

use crate::index::ElemIndex;

/// A value with a fixed 32-bit-word layout.
pub trait Element: Copy {
    /// Number of words one value occupies.
    const WORDS: usize;

    /// Encode into exactly [`Element::WORDS`] words.
    fn write_words(&self, out: &mut [u32]);

    /// Decode from exactly [`Element::WORDS`] words.
    fn read_words(words: &[u32]) -> Self;

    /// Size of one value in bytes.
    fn stride() -> u32 {
        (Self::WORDS * 4) as u32
    }
}

impl Element for u32 {
    const WORDS: usize = 1;

    fn write_words(&self, out: &mut [u32]) {
        out[0] = *self;
    }

    fn read_words(words: &[u32]) -> Self {
        words[0]
    }
}

impl Element for i32 {
    const WORDS: usize = 1;

    fn write_words(&self, out: &mut [u32]) {
        out[0] = *self as u32;
    }

    fn read_words(words: &[u32]) -> Self {
        words[0] as i32
    }
}

impl Element for f32 {
    const WORDS: usize = 1;

    fn write_words(&self, out: &mut [u32]) {
        out[0] = self.to_bits();
    }

    fn read_words(words: &[u32]) -> Self {
        f32::from_bits(words[0])
    }
}

impl Element for u64 {
    const WORDS: usize = 2;

    fn write_words(&self, out: &mut [u32]) {
        out[0] = *self as u32;
        out[1] = (*self >> 32) as u32;
    }

    fn read_words(words: &[u32]) -> Self {
        u64::from(words[0]) | (u64::from(words[1]) << 32)
    }
}

impl<const N: usize> Element for [u32; N] {
    const WORDS: usize = N;

    fn write_words(&self, out: &mut [u32]) {
        out[..N].copy_from_slice(self);
    }

    fn read_words(words: &[u32]) -> Self {
        let mut value = [0; N];
        value.copy_from_slice(&words[..N]);
        value
    }
}

impl Element for ElemIndex {
    const WORDS: usize = 1;

    fn write_words(&self, out: &mut [u32]) {
        out[0] = self.raw();
    }

    fn read_words(words: &[u32]) -> Self {
        ElemIndex::from_raw(words[0])
    }
}

impl Element for ListgenElement {
    const WORDS: usize = MAX_NUM_INDICES + 1;

    fn write_words(&self, out: &mut [u32]) {
        for (w, &c) in out.iter_mut().zip(&self.coords.at) {
            *w = c as u32;
        }
        out[MAX_NUM_INDICES] = self.mem_offset;
    }

    fn read_words(words: &[u32]) -> Self {
        let mut coords = ElementCoords::ORIGIN;
        for (c, &w) in coords.at.iter_mut().zip(words) {
            *c = w as i32;
        }
        ListgenElement::new(coords, words[MAX_NUM_INDICES])
    }
}
