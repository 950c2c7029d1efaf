//! Append-only growable lists backed by lazily allocated chunks.
//!
//! A [`ListHeader`] is the shared state of one list: an atomic element
//! count and a table of chunk offsets. A [`ChunkedList`] is a cheap,
//! copyable view pairing a header with the arena its chunks live in.
//!
//! Each chunk-table entry follows the allocate-once protocol:
//!
//! ```text
//! 0 (UNALLOCATED) --CAS--> 1 (ALLOCATING) --store--> offset > 1 (ALLOCATED)
//! ```
//!
//! Exactly one thread performs the arena allocation for a chunk; the
//! rest spin until the offset is published.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use crossbeam_utils::Backoff;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::arena::{Addr, MemoryArena, PtrOffset};
use crate::config::ListConfig;
use crate::element::Element;
use crate::error::ArenaError;

const UNALLOCATED: u32 = 0;
const ALLOCATING: u32 = 1;

/// Shared state of one chunked list.
pub struct ListHeader {
    /// Number of reserved elements.
    next: AtomicU32,
    log2_elems_per_chunk: u32,
    element_stride: u32,
    /// Chunk base offsets, or one of the two sentinels.
    chunks: Box<[AtomicU32]>,
}

impl ListHeader {
    /// Create an empty list header.
    pub fn new(config: &ListConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let chunks: Box<[AtomicU32]> = (0..config.max_chunks)
            .map(|_| AtomicU32::new(UNALLOCATED))
            .collect();
        debug!(
            element_stride = config.element_stride,
            log2_elems_per_chunk = config.log2_elems_per_chunk,
            max_chunks = config.max_chunks,
            "list header created"
        );
        Ok(Self {
            next: AtomicU32::new(0),
            log2_elems_per_chunk: config.log2_elems_per_chunk,
            element_stride: config.element_stride,
            chunks,
        })
    }

    /// Size of one element in bytes.
    pub fn element_stride(&self) -> u32 {
        self.element_stride
    }

    /// Log2 of the number of elements per chunk.
    pub fn log2_elems_per_chunk(&self) -> u32 {
        self.log2_elems_per_chunk
    }

    /// Number of elements per chunk.
    pub fn elems_per_chunk(&self) -> u32 {
        1 << self.log2_elems_per_chunk
    }

    /// Bytes occupied by one chunk.
    pub fn chunk_bytes(&self) -> u32 {
        self.element_stride << self.log2_elems_per_chunk
    }

    /// Size of the chunk table.
    pub fn max_chunks(&self) -> u32 {
        self.chunks.len() as u32
    }

    /// Number of chunks whose offset has been published.
    pub fn published_chunks(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.load(Ordering::Acquire) > ALLOCATING)
            .count()
    }

    /// Bind this header to the arena holding its chunks.
    pub fn manager<'a>(&'a self, arena: &'a MemoryArena) -> ChunkedList<'a> {
        ChunkedList::new(self, arena)
    }
}

/// Result of [`ChunkedList::reserve_new_elem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedElem {
    /// The element's index in the list. Unique across all callers.
    pub index: u32,
    /// Offset of the chunk holding the element.
    pub chunk_offset: PtrOffset,
}

/// Untyped view over a chunked list.
///
/// Append is the only mutator. Reading an index at or beyond
/// [`ChunkedList::num_active`], or one whose append has not finished,
/// is a caller-upheld precondition.
#[derive(Clone, Copy)]
pub struct ChunkedList<'a> {
    header: &'a ListHeader,
    arena: &'a MemoryArena,
}

impl<'a> ChunkedList<'a> {
    /// Pair a header with its arena.
    pub fn new(header: &'a ListHeader, arena: &'a MemoryArena) -> Self {
        Self { header, arena }
    }

    /// The list's shared header.
    pub fn header(&self) -> &'a ListHeader {
        self.header
    }

    /// The arena chunks are allocated from.
    pub fn arena(&self) -> &'a MemoryArena {
        self.arena
    }

    /// Number of reserved elements.
    #[inline]
    pub fn num_active(&self) -> u32 {
        self.header.next.load(Ordering::Relaxed)
    }

    /// Overwrite the element count.
    ///
    /// Chunks stay published; growing past previously appended elements
    /// exposes whatever those slots last held.
    pub fn resize(&self, n: u32) {
        self.header.next.store(n, Ordering::Relaxed);
    }

    /// Reset the element count to zero.
    pub fn clear(&self) {
        self.resize(0);
    }

    /// Claim a fresh index and make sure its chunk exists.
    pub fn reserve_new_elem(&self) -> ReservedElem {
        let index = self.header.next.fetch_add(1, Ordering::Relaxed);
        let chunk_idx = index >> self.header.log2_elems_per_chunk;
        let chunk_offset = self.ensure_chunk(chunk_idx);
        ReservedElem {
            index,
            chunk_offset,
        }
    }

    /// Append an uninitialized element and return its address.
    ///
    /// The slot holds zeros if its chunk is fresh, or stale bytes if the
    /// list was cleared and is being refilled.
    pub fn append_slot(&self) -> Addr {
        let reserved = self.reserve_new_elem();
        self.elem_in_chunk(reserved.index, reserved.chunk_offset)
    }

    /// Append raw words. `words` must be exactly one element long.
    pub fn append_words(&self, words: &[u32]) -> u32 {
        debug_assert_eq!(
            words.len() * 4,
            self.header.element_stride as usize,
            "element does not match list stride"
        );
        let reserved = self.reserve_new_elem();
        let addr = self.elem_in_chunk(reserved.index, reserved.chunk_offset);
        self.arena.write_words(addr, words);
        reserved.index
    }

    /// Address of element `i`.
    #[inline]
    pub fn addr_of(&self, i: u32) -> Addr {
        let chunk_idx = (i >> self.header.log2_elems_per_chunk) as usize;
        let chunk_offset = self.header.chunks[chunk_idx].load(Ordering::Acquire);
        debug_assert!(
            chunk_offset > ALLOCATING,
            "element {i} lives in unpublished chunk {chunk_idx}"
        );
        self.elem_in_chunk(i, chunk_offset)
    }

    /// A typed view, provided `T` has exactly this list's stride.
    pub fn typed<T: Element>(self) -> Result<TypedList<'a, T>, ArenaError> {
        if T::stride() != self.header.element_stride {
            return Err(ArenaError::StrideMismatch {
                expected: self.header.element_stride,
                actual: T::stride(),
            });
        }
        Ok(TypedList {
            list: self,
            _marker: PhantomData,
        })
    }

    fn ensure_chunk(&self, i: u32) -> PtrOffset {
        debug_assert!(
            i < self.header.max_chunks(),
            "chunk {i} beyond table of {}",
            self.header.max_chunks()
        );
        let slot = &self.header.chunks[i as usize];
        let stored = slot.load(Ordering::Acquire);
        if stored > ALLOCATING {
            return stored;
        }

        let backoff = Backoff::new();
        loop {
            // The CAS winner allocates; the offset it publishes is > 1
            // because the arena never hands out offsets 0 or 1.
            match slot.compare_exchange_weak(
                UNALLOCATED,
                ALLOCATING,
                Ordering::Acquire,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let offset = self.arena.alloc(self.header.chunk_bytes());
                    trace!(chunk = i, offset, "chunk allocated");
                    slot.store(offset, Ordering::Release);
                    return offset;
                }
                Err(stored) if stored > ALLOCATING => return stored,
                // Another thread is allocating, or the weak CAS failed spuriously.
                Err(_) => backoff.snooze(),
            }
        }
    }

    #[inline]
    fn elem_in_chunk(&self, i: u32, chunk_offset: PtrOffset) -> Addr {
        let mask = self.header.elems_per_chunk() - 1;
        self.arena
            .to_addr(chunk_offset)
            .offset((i & mask) * self.header.element_stride)
    }
}

/// Typed view over a chunked list whose stride matches `T`.
///
/// Obtained from [`ChunkedList::typed`].
#[derive(Clone, Copy)]
pub struct TypedList<'a, T: Element> {
    list: ChunkedList<'a>,
    _marker: PhantomData<fn() -> T>,
}

/// Elements up to this many words encode on the stack.
type WordBuf = SmallVec<[u32; 16]>;

impl<'a, T: Element> TypedList<'a, T> {
    /// The untyped view.
    pub fn untyped(&self) -> ChunkedList<'a> {
        self.list
    }

    /// Number of reserved elements.
    pub fn num_active(&self) -> u32 {
        self.list.num_active()
    }

    /// Reset the element count to zero.
    pub fn clear(&self) {
        self.list.clear();
    }

    /// Append `elem` and return its index.
    pub fn append(&self, elem: &T) -> u32 {
        let mut words: WordBuf = SmallVec::from_elem(0, T::WORDS);
        elem.write_words(&mut words);
        self.list.append_words(&words)
    }

    /// Read element `i`.
    pub fn get(&self, i: u32) -> T {
        let mut words: WordBuf = SmallVec::from_elem(0, T::WORDS);
        self.list.arena.read_words(self.list.addr_of(i), &mut words);
        T::read_words(&words)
    }

    /// Overwrite element `i` in place.
    pub fn set(&self, i: u32, elem: &T) {
        let mut words: WordBuf = SmallVec::from_elem(0, T::WORDS);
        elem.write_words(&mut words);
        self.list.arena.write_words(self.list.addr_of(i), &words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_core::{ElementCoords, ListgenElement};

    fn small_list(stride: u32) -> ListHeader {
        ListHeader::new(&ListConfig::new(stride).with_chunking(2, 64)).unwrap()
    }

    #[test]
    fn new_list_is_empty() {
        let header = small_list(4);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena);
        assert_eq!(list.num_active(), 0);
        assert_eq!(header.published_chunks(), 0);
    }

    #[test]
    fn append_and_get_across_chunks() {
        let header = small_list(4);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena).typed::<u32>().unwrap();
        for v in 0..10u32 {
            assert_eq!(list.append(&(v * 3)), v);
        }
        assert_eq!(list.num_active(), 10);
        assert_eq!(header.published_chunks(), 3);
        for i in 0..10 {
            assert_eq!(list.get(i), i * 3);
        }
    }

    #[test]
    fn chunk_is_allocated_once() {
        let header = small_list(8);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena);
        list.append_slot();
        let after_first = arena.used_bytes();
        assert_eq!(after_first, header.chunk_bytes());
        list.append_slot();
        list.append_slot();
        list.append_slot();
        assert_eq!(arena.used_bytes(), after_first);
        list.append_slot();
        assert_eq!(arena.used_bytes(), 2 * header.chunk_bytes());
    }

    #[test]
    fn slots_in_a_chunk_are_contiguous() {
        let header = small_list(12);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena);
        let a = list.append_slot();
        let b = list.append_slot();
        assert_eq!(b.get() - a.get(), 12);
        assert_eq!(list.addr_of(1), b);
    }

    #[test]
    fn reserve_reports_chunk_offset() {
        let header = small_list(4);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena);
        let r0 = list.reserve_new_elem();
        let r1 = list.reserve_new_elem();
        assert_eq!(r0.index, 0);
        assert_eq!(r1.index, 1);
        assert_eq!(r0.chunk_offset, r1.chunk_offset);
        assert!(r0.chunk_offset > ALLOCATING);
    }

    #[test]
    fn clear_reuses_published_chunks() {
        let header = small_list(4);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena).typed::<u32>().unwrap();
        for v in 0..6 {
            list.append(&v);
        }
        let used = arena.used_bytes();
        list.clear();
        assert_eq!(list.num_active(), 0);
        for v in 100..106 {
            list.append(&v);
        }
        assert_eq!(arena.used_bytes(), used);
        assert_eq!(list.get(5), 105);
    }

    #[test]
    fn resize_sets_count() {
        let header = small_list(4);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena);
        list.resize(3);
        assert_eq!(list.num_active(), 3);
        assert_eq!(list.reserve_new_elem().index, 3);
    }

    #[test]
    fn typed_rejects_wrong_stride() {
        let header = small_list(8);
        let arena = MemoryArena::with_capacity(4096);
        let err = header.manager(&arena).typed::<u32>().err().unwrap();
        assert_eq!(
            err,
            ArenaError::StrideMismatch {
                expected: 8,
                actual: 4
            }
        );
        assert!(header.manager(&arena).typed::<u64>().is_ok());
    }

    #[test]
    fn set_overwrites_in_place() {
        let header = small_list(8);
        let arena = MemoryArena::with_capacity(4096);
        let list = header.manager(&arena).typed::<[u32; 2]>().unwrap();
        list.append(&[1, 2]);
        list.set(0, &[7, 8]);
        assert_eq!(list.get(0), [7, 8]);
        assert_eq!(list.num_active(), 1);
    }

    #[test]
    fn listgen_elements_are_stored_whole() {
        let header = ListHeader::new(&ListConfig::new(ListgenElement::stride())).unwrap();
        let arena = MemoryArena::with_capacity(1 << 20);
        let list = header.manager(&arena).typed::<ListgenElement>().unwrap();
        let elem = ListgenElement::new(ElementCoords::from_axes(&[4, 8]), 128);
        let idx = list.append(&elem);
        assert_eq!(list.get(idx), elem);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(ListHeader::new(&ListConfig::new(3)).is_err());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn appended_values_read_back_in_order(
                values in proptest::collection::vec(any::<u64>(), 0..200),
                log2 in 0u32..5,
            ) {
                let header = ListHeader::new(
                    &ListConfig::new(8).with_chunking(log2, 256),
                ).unwrap();
                let arena = MemoryArena::with_capacity(1 << 16);
                let list = header.manager(&arena).typed::<u64>().unwrap();
                for v in &values {
                    list.append(v);
                }
                prop_assert_eq!(list.num_active() as usize, values.len());
                for (i, v) in values.iter().enumerate() {
                    prop_assert_eq!(list.get(i as u32), *v);
                }
                let chunks = values.len().div_ceil(1 << log2);
                prop_assert_eq!(header.published_chunks(), chunks);
                prop_assert_eq!(arena.used_bytes(), chunks as u32 * header.chunk_bytes());
            }
        }
    }
}
