// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture-space mapping between pyramid levels.
//!
//! While a tile's own data is still loading, the overlay samples the nearest
//! loaded ancestor instead. [`AncestorUv`] is the affine that maps the
//! tile's unit square into the ancestor's texture:
//!
//! ```text
//! ancestor_uv = tile_uv * scale + offset
//! ```
//!
//! For an ancestor `k` display-zoom levels coarser, `scale = 2^-k` and the
//! offset selects which of the ancestor's `4^k` quadrant cells the tile
//! occupies, so one coarse texture stands in for every descendant without
//! re-fetching.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::tile::TileId;

/// Affine mapping a tile's unit square into an ancestor's texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AncestorUv {
    /// Uniform scale factor (`2^(ancestor.overscaled_z - tile.overscaled_z)`,
    /// `< 1` for a coarser ancestor).
    pub scale: f32,
    /// Top-left offset inside the ancestor's texture; components in `[0, 1)`.
    pub offset: [f32; 2],
}

impl AncestorUv {
    /// The identity mapping, used when a tile has no loaded ancestor and
    /// samples its own texture through the secondary binding.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: [0.0, 0.0],
    };

    /// Computes the mapping from `tile`'s unit square into `ancestor`'s
    /// texture.
    ///
    /// `ancestor` must cover the same geographic area at a coarser (or
    /// equal) display zoom; the host's ancestor lookup guarantees this.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "scale and offsets are in [0, 1]; f32 is the GPU-facing precision"
    )]
    pub fn between(tile: TileId, ancestor: TileId) -> Self {
        let delta = i32::from(ancestor.overscaled_z) - i32::from(tile.overscaled_z);
        debug_assert!(
            delta.unsigned_abs() < 64,
            "zoom delta exceeds pyramid depth"
        );
        let scale = if delta >= 0 {
            (1_u64 << delta) as f64
        } else {
            1.0 / (1_u64 << delta.unsigned_abs()) as f64
        };

        let ox = f64::from(tile.x) * scale;
        let oy = f64::from(tile.y) * scale;
        Self {
            scale: scale as f32,
            offset: [(ox - ox.floor()) as f32, (oy - oy.floor()) as f32],
        }
    }
}

/// Distance of a display zoom from the viewport's ideal zoom level.
///
/// The fade direction decision compares the tile's and the ancestor's
/// distance: whichever is closer to the ideal is the better-resolution
/// choice and should become dominant.
#[inline]
#[must_use]
pub fn zoom_distance(overscaled_z: u8, ideal_zoom: f64) -> f64 {
    (f64::from(overscaled_z) - ideal_zoom).abs()
}
