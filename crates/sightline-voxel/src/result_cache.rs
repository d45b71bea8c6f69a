//! Sparse memo of whole-query outcomes, keyed by target offset from the origin.
//!
//! Targets may lie arbitrarily far from the origin, so this cache cannot use a
//! fixed window like [`OpacityCache`](crate::OpacityCache). Entries live in an
//! `FxHashMap` and are only ever evicted all at once.

use glam::IVec3;
use rustc_hash::FxHashMap;

/// Boolean outcome per integer offset.
///
/// Entries are meaningful only for the origin that was active when they were
/// written; clear the cache whenever the origin moves.
#[derive(Debug, Default, Clone)]
pub struct ResultCache {
    entries: FxHashMap<IVec3, bool>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache with room for `capacity` entries before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the cached outcome for `offset`, running `compute` on a miss.
    ///
    /// `compute` runs at most once per offset between clears.
    pub fn get_or_compute(&mut self, offset: IVec3, compute: impl FnOnce() -> bool) -> bool {
        *self.entries.entry(offset).or_insert_with(compute)
    }

    pub fn get(&self, offset: IVec3) -> Option<bool> {
        self.entries.get(&offset).copied()
    }

    /// Stores an outcome directly, replacing any previous entry.
    pub fn insert(&mut self, offset: IVec3, value: bool) {
        self.entries.insert(offset, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. The allocation is kept for the next epoch.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::trace!(entries = dropped, "cleared result cache");
    }
}
