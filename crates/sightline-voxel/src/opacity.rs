//! Tri-state opacity classification stored by the opacity cache.

use serde::{Deserialize, Serialize};

/// Cached opacity of a single voxel.
///
/// The discriminants are the raw 2-bit values kept in cache storage. `0` is
/// reserved for "not cached yet" so that zeroed memory is an empty cache; the
/// bit pattern `3` is never written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opacity {
    /// Not classified, or outside the cache window.
    #[default]
    Unknown = 0,
    /// Blocks line of sight.
    Opaque = 1,
    /// Lets line of sight through.
    Transparent = 2,
}

impl Opacity {
    /// Mask selecting one packed voxel value.
    pub const MASK: u32 = 0b11;

    /// Decodes a packed 2-bit value. Anything outside `1..=2` reads as `Unknown`.
    pub const fn from_bits(bits: u32) -> Opacity {
        match bits & Self::MASK {
            1 => Opacity::Opaque,
            2 => Opacity::Transparent,
            _ => Opacity::Unknown,
        }
    }

    /// The packed 2-bit representation.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Classification for a predicate answer.
    pub const fn from_opaque(opaque: bool) -> Opacity {
        if opaque {
            Opacity::Opaque
        } else {
            Opacity::Transparent
        }
    }

    /// `true` once the voxel has been classified either way.
    pub const fn is_known(self) -> bool {
        !matches!(self, Opacity::Unknown)
    }

    /// `true` only for [`Opacity::Opaque`]; unknown voxels are not opaque.
    pub const fn is_opaque(self) -> bool {
        matches!(self, Opacity::Opaque)
    }
}
