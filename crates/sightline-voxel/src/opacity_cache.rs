//! Chunked, bit-packed opacity cache around a movable origin.
//!
//! The cache covers a cube of `2 * radius + 1` chunks per axis, centered on
//! the chunk containing the origin. Coordinates passed in are relative to the
//! origin voxel, so chunk `0` of each axis sits at arena index `radius`.
//!
//! Every chunk is 16×16×16 voxels stored as 256 `u32` slots. A slot holds one
//! row of 16 voxels along X at 2 bits each; `(z << 4) | y` picks the slot and
//! `x << 1` picks the bit offset inside it. Zeroed storage means "unknown",
//! so clearing a chunk is a plain fill.
//!
//! Chunks remember whether they were written since the last [`OpacityCache::clear`]
//! and the cache keeps a list of those chunks. Clearing walks that list only,
//! so its cost follows the number of chunks actually touched rather than the
//! window volume.

use glam::IVec3;
use static_assertions::{const_assert, const_assert_eq};
use thiserror::Error;

use crate::opacity::Opacity;

/// Side length of a cache chunk in voxels.
pub const CHUNK_SIZE: i32 = 16;

/// Number of packed `u32` slots per chunk (one per `(y, z)` row).
pub const CHUNK_SLOTS: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Largest accepted window radius in chunks (33³ chunks, ~36 MiB).
pub const MAX_CACHE_RADIUS: u32 = 16;

const CHUNK_SHIFT: i32 = 4;
const LOCAL_MASK: i32 = CHUNK_SIZE - 1;

const_assert_eq!(1 << CHUNK_SHIFT, CHUNK_SIZE);
// A full X row of 2-bit values has to fit in one slot.
const_assert!(CHUNK_SIZE as u32 * 2 <= u32::BITS);

/// Errors raised when building a cache.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The requested window would be larger than [`MAX_CACHE_RADIUS`] allows.
    #[error("cache radius {radius} exceeds the maximum of {max} chunks")]
    RadiusTooLarge { radius: u32, max: u32 },
}

#[derive(Clone)]
struct CacheChunk {
    slots: [u32; CHUNK_SLOTS],
    dirty: bool,
}

impl CacheChunk {
    const EMPTY: CacheChunk = CacheChunk {
        slots: [0; CHUNK_SLOTS],
        dirty: false,
    };
}

/// Resolved storage position of one voxel.
#[derive(Clone, Copy, Debug)]
struct Location {
    chunk: usize,
    slot: usize,
    shift: u32,
}

/// Tri-state opacity memo over a bounded window of chunks.
pub struct OpacityCache {
    radius: i32,
    size: i32,
    chunks: Vec<CacheChunk>,
    /// Arena indices of chunks written since the last clear, in write order.
    dirty: Vec<usize>,
}

impl OpacityCache {
    /// Creates an empty cache spanning `2 * radius + 1` chunks on each axis.
    pub fn new(radius: u32) -> Result<Self, CacheError> {
        if radius > MAX_CACHE_RADIUS {
            tracing::warn!(radius, max = MAX_CACHE_RADIUS, "rejecting opacity cache radius");
            return Err(CacheError::RadiusTooLarge {
                radius,
                max: MAX_CACHE_RADIUS,
            });
        }
        let radius = radius as i32;
        let size = radius * 2 + 1;
        let count = (size * size * size) as usize;
        Ok(Self {
            radius,
            size,
            chunks: vec![CacheChunk::EMPTY; count],
            dirty: Vec::new(),
        })
    }

    /// Window radius in chunks.
    pub fn radius(&self) -> u32 {
        self.radius as u32
    }

    /// Window side length in chunks.
    pub fn size_chunks(&self) -> u32 {
        self.size as u32
    }

    /// Total number of chunks in the window.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks written since the last clear.
    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty.len()
    }

    /// `true` if nothing has been written since the last clear.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Whether `pos` (relative to the origin voxel) lies inside the window.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.locate(pos).is_some()
    }

    /// Returns the cached opacity at `pos` without computing anything.
    ///
    /// Voxels outside the window read as [`Opacity::Unknown`].
    pub fn get(&self, pos: IVec3) -> Opacity {
        match self.locate(pos) {
            Some(loc) => self.read(loc),
            None => Opacity::Unknown,
        }
    }

    /// Overwrites the cached opacity at `pos`. Ignored outside the window.
    pub fn set(&mut self, pos: IVec3, value: Opacity) {
        let Some(loc) = self.locate(pos) else {
            return;
        };
        let slot = &mut self.chunks[loc.chunk].slots[loc.slot];
        *slot = (*slot & !(Opacity::MASK << loc.shift)) | (value.bits() << loc.shift);
        self.mark_dirty(loc.chunk);
    }

    /// Returns the cached opacity at `pos`, calling `compute` on a miss.
    ///
    /// `compute` runs at most once per voxel between clears and should return
    /// `Opaque` or `Transparent`. Outside the window nothing is stored, the
    /// closure is not called and [`Opacity::Unknown`] is returned; the caller
    /// has to ask the source of truth itself.
    pub fn get_or_compute(&mut self, pos: IVec3, compute: impl FnOnce() -> Opacity) -> Opacity {
        match self.locate(pos) {
            Some(loc) => self.fetch(loc, compute),
            None => Opacity::Unknown,
        }
    }

    /// Boolean form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// Outside the window `is_opaque` is evaluated directly on every call.
    pub fn get_or_compute_opaque(&mut self, pos: IVec3, is_opaque: impl FnOnce() -> bool) -> bool {
        match self.locate(pos) {
            Some(loc) => self
                .fetch(loc, || Opacity::from_opaque(is_opaque()))
                .is_opaque(),
            None => is_opaque(),
        }
    }

    /// Forgets every cached value, touching only dirty chunks.
    pub fn clear(&mut self) {
        let reset = self.dirty.len();
        for index in self.dirty.drain(..) {
            let chunk = &mut self.chunks[index];
            chunk.slots.fill(0);
            chunk.dirty = false;
        }
        tracing::trace!(chunks = reset, "cleared opacity cache");
    }

    fn fetch(&mut self, loc: Location, compute: impl FnOnce() -> Opacity) -> Opacity {
        let section = self.chunks[loc.chunk].slots[loc.slot];
        let cached = Opacity::from_bits(section >> loc.shift);
        if cached.is_known() {
            return cached;
        }
        let value = compute();
        debug_assert!(value.is_known(), "opacity compute must classify the voxel");
        self.chunks[loc.chunk].slots[loc.slot] =
            section | ((value.bits() & Opacity::MASK) << loc.shift);
        self.mark_dirty(loc.chunk);
        value
    }

    fn read(&self, loc: Location) -> Opacity {
        Opacity::from_bits(self.chunks[loc.chunk].slots[loc.slot] >> loc.shift)
    }

    fn mark_dirty(&mut self, index: usize) {
        let chunk = &mut self.chunks[index];
        if !chunk.dirty {
            chunk.dirty = true;
            self.dirty.push(index);
        }
    }

    fn locate(&self, pos: IVec3) -> Option<Location> {
        let cx = self.chunk_axis(pos.x)?;
        let cy = self.chunk_axis(pos.y)?;
        let cz = self.chunk_axis(pos.z)?;
        let chunk = ((cz * self.size + cy) * self.size + cx) as usize;
        let slot = (((pos.z & LOCAL_MASK) << CHUNK_SHIFT) | (pos.y & LOCAL_MASK)) as usize;
        let shift = ((pos.x & LOCAL_MASK) << 1) as u32;
        Some(Location { chunk, slot, shift })
    }

    fn chunk_axis(&self, coord: i32) -> Option<i32> {
        let c = (coord >> CHUNK_SHIFT) + self.radius;
        (0..self.size).contains(&c).then_some(c)
    }
}

impl std::fmt::Debug for OpacityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpacityCache")
            .field("radius", &self.radius)
            .field("chunks", &self.chunks.len())
            .field("dirty", &self.dirty.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
