//! Voxel-side building blocks for line-of-sight queries: axis directions, the
//! chunked 2-bit opacity cache, and the sparse per-target result cache.

pub mod cache;
pub mod direction;
pub mod opacity;
pub mod opacity_cache;
pub mod result_cache;

pub use cache::RaytraceCache;
pub use direction::{Axis, Direction};
pub use opacity::Opacity;
pub use opacity_cache::{CHUNK_SIZE, CHUNK_SLOTS, CacheError, MAX_CACHE_RADIUS, OpacityCache};
pub use result_cache::ResultCache;
