//! Arena, list and pool configuration parameters.
//!
//! All configs are plain data validated once at construction; nothing
//! is re-checked on the hot path.

use crate::arena::MemoryArena;
use crate::error::ArenaError;

/// Configuration for a [`MemoryArena`].
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Default: 64MB. Must be a multiple of [`MemoryArena::ALIGNMENT`]
    /// and larger than the reserved sentinel prefix.
    pub capacity_bytes: u32,
}

impl ArenaConfig {
    /// Default capacity: 64MB.
    pub const DEFAULT_CAPACITY_BYTES: u32 = 64 * 1024 * 1024;

    /// Create a config with the given capacity.
    pub fn new(capacity_bytes: u32) -> Self {
        Self { capacity_bytes }
    }

    /// Check that the capacity is usable.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity_bytes % MemoryArena::ALIGNMENT != 0
            || self.capacity_bytes <= MemoryArena::ALIGNMENT
        {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "capacity_bytes must be a multiple of {} and greater than it (got {})",
                    MemoryArena::ALIGNMENT,
                    self.capacity_bytes
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_BYTES)
    }
}

/// Configuration for a chunked list.
#[derive(Clone, Debug)]
pub struct ListConfig {
    /// Size of one element in bytes. Must be a non-zero multiple of 4.
    pub element_stride: u32,
    /// Log2 of the number of elements per chunk. At most 20.
    pub log2_elems_per_chunk: u32,
    /// Number of entries in the chunk table. At least 1.
    ///
    /// The list holds at most `max_chunks << log2_elems_per_chunk`
    /// elements; going past that is a caller-upheld precondition.
    pub max_chunks: u32,
}

impl ListConfig {
    /// Default elements per chunk: 1024.
    pub const DEFAULT_LOG2_ELEMS_PER_CHUNK: u32 = 10;

    /// Default chunk table size.
    pub const DEFAULT_MAX_CHUNKS: u32 = 1024;

    /// Largest accepted `log2_elems_per_chunk`.
    pub const MAX_LOG2_ELEMS_PER_CHUNK: u32 = 20;

    /// Create a config for the given stride with default chunking.
    pub fn new(element_stride: u32) -> Self {
        Self {
            element_stride,
            log2_elems_per_chunk: Self::DEFAULT_LOG2_ELEMS_PER_CHUNK,
            max_chunks: Self::DEFAULT_MAX_CHUNKS,
        }
    }

    /// Override the chunk geometry, builder style.
    pub fn with_chunking(mut self, log2_elems_per_chunk: u32, max_chunks: u32) -> Self {
        self.log2_elems_per_chunk = log2_elems_per_chunk;
        self.max_chunks = max_chunks;
        self
    }

    /// Bytes occupied by one chunk.
    pub fn chunk_bytes(&self) -> u32 {
        self.element_stride << self.log2_elems_per_chunk
    }

    /// Check stride and chunk geometry.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.element_stride == 0 || self.element_stride % 4 != 0 {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "element_stride must be a non-zero multiple of 4 (got {})",
                    self.element_stride
                ),
            });
        }
        if self.log2_elems_per_chunk > Self::MAX_LOG2_ELEMS_PER_CHUNK {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "log2_elems_per_chunk must be <= {} (got {})",
                    Self::MAX_LOG2_ELEMS_PER_CHUNK,
                    self.log2_elems_per_chunk
                ),
            });
        }
        if self.max_chunks == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "max_chunks must be at least 1".to_string(),
            });
        }
        if u64::from(self.element_stride) << self.log2_elems_per_chunk > u64::from(u32::MAX) {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "chunk of {} elements at stride {} overflows a 32-bit offset",
                    1u64 << self.log2_elems_per_chunk,
                    self.element_stride
                ),
            });
        }
        Ok(())
    }
}

/// Configuration for a [`SlotPool`](crate::pool::SlotPool).
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Size of one slot in bytes. Must be a non-zero multiple of 4.
    pub slot_stride: u32,
    /// Log2 of the slots per chunk, shared by all three lists.
    pub log2_slots_per_chunk: u32,
    /// Chunk table size, shared by all three lists.
    pub max_chunks: u32,
}

impl PoolConfig {
    /// Create a config for the given slot stride with default chunking.
    pub fn new(slot_stride: u32) -> Self {
        Self {
            slot_stride,
            log2_slots_per_chunk: ListConfig::DEFAULT_LOG2_ELEMS_PER_CHUNK,
            max_chunks: ListConfig::DEFAULT_MAX_CHUNKS,
        }
    }

    /// Override the chunk geometry, builder style.
    pub fn with_chunking(mut self, log2_slots_per_chunk: u32, max_chunks: u32) -> Self {
        self.log2_slots_per_chunk = log2_slots_per_chunk;
        self.max_chunks = max_chunks;
        self
    }

    /// Config of the list that stores slot payloads.
    pub fn data_list(&self) -> ListConfig {
        ListConfig::new(self.slot_stride).with_chunking(self.log2_slots_per_chunk, self.max_chunks)
    }

    /// Config of the free and recycled lists, which store slot indices.
    pub fn index_list(&self) -> ListConfig {
        ListConfig::new(std::mem::size_of::<u32>() as u32)
            .with_chunking(self.log2_slots_per_chunk, self.max_chunks)
    }
}
