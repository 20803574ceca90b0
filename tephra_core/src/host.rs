// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for map-engine integrations.
//!
//! The overlay is a guest inside a host map engine that owns the frame
//! lifecycle, the tile cache, texture upload, and the camera. Each frame the
//! host provides the following pieces:
//!
//! - **Tile state** — [`TileSource`] enumerates the tiles intersecting the
//!   viewport (recomputed every frame; the loaded set changes
//!   asynchronously), resolves per-tile state, and walks the pyramid for
//!   ancestor lookup. It also applies the overlay's
//!   [`TileUpdate`](crate::tile::TileUpdate)s, the only mutation channel.
//!
//! - **Camera** — [`Camera`] supplies the per-tile projection matrix
//!   (unwrapped world position → clip space). The ideal zoom scalar rides
//!   in [`FrameInputs`] since it is per-frame, not per-tile.
//!
//! - **Overlap policy** — [`OverlapPolicy`] returns the stencil
//!   configuration that prevents tiles at different pyramid depths from
//!   double-blending where they overlap. The overlay consumes it opaquely:
//!   it applies the returned [`StencilMode`] per draw and never infers
//!   ordering itself.
//!
//! # Frame loop pseudocode
//!
//! A typical host render callback wires the pieces together like this:
//!
//! ```rust,ignore
//! fn on_render_pass(pass_kind: RenderPassKind) {
//!     let frame = FrameInputs {
//!         now: host_clock_now(),
//!         ideal_zoom: transform.covering_zoom_level(),
//!         is_initial_load: map.is_initial_load(),
//!         pass: pass_kind,
//!         timebase: host_timebase(),
//!     };
//!     overlay.plan_frame(&mut cache, &camera, &painter, &frame, &mut tracer, &mut plan);
//!     let prepared = program.prepare(&device, &queue, &plan, &cache);
//!     program.draw(&mut render_pass, &prepared);
//! }
//! ```

use alloc::vec::Vec;

use crate::tile::{TileId, TileState, TileUpdate};
use crate::time::{Duration, HostTime, Timebase};

/// Fade window used while the map is still in its initial load, in
/// milliseconds.
pub const INITIAL_LOAD_FADE_MS: u64 = 100;

/// Steady-state fade window, in milliseconds.
pub const STEADY_FADE_MS: u64 = 400;

/// Resolves the fade window for the host's current load phase into host
/// ticks.
#[inline]
#[must_use]
pub const fn fade_duration(is_initial_load: bool, timebase: Timebase) -> Duration {
    if is_initial_load {
        Duration::from_millis(INITIAL_LOAD_FADE_MS, timebase)
    } else {
        Duration::from_millis(STEADY_FADE_MS, timebase)
    }
}

/// Which render pass the host is currently executing.
///
/// The overlay draws alpha-blended content and only participates in the
/// translucent pass; planning during any other pass is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPassKind {
    /// Opaque geometry pass.
    Opaque,
    /// Translucent/alpha-blended pass — the overlay's pass.
    Translucent,
    /// Offscreen/preparatory pass.
    Offscreen,
}

/// Date-range bounds threaded into the decode stage.
///
/// The bounds are passed through unmodified; the overlay does not validate
/// `start_index <= end_index` (caller precondition) and the reference decode
/// behavior does not apply them as a filter.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DateRange {
    /// First day index of the range.
    pub start_index: f32,
    /// Last day index of the range.
    pub end_index: f32,
}

/// Stencil mode the host's overlap policy assigns to a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilMode {
    /// No stencil test; every fragment passes.
    Always,
    /// Fragments pass where the stencil buffer equals `reference`.
    Equal {
        /// Reference value compared against the stencil buffer.
        reference: u32,
    },
}

/// The host's overlap-resolution answer for one frame's visible set.
#[derive(Clone, Debug, Default)]
pub struct OverlapConfig {
    /// Stencil mode per display zoom present in the visible set.
    pub modes: Vec<(u8, StencilMode)>,
    /// The visible tiles in the order the host wants them drawn.
    pub order: Vec<TileId>,
}

impl OverlapConfig {
    /// A configuration that draws `tiles` in the given order with no
    /// stenciling. Suitable for hosts rendering a single pyramid depth.
    #[must_use]
    pub fn unstenciled(tiles: &[TileId]) -> Self {
        Self {
            modes: Vec::new(),
            order: tiles.to_vec(),
        }
    }

    /// Returns the stencil mode for a display zoom (default
    /// [`StencilMode::Always`]).
    #[must_use]
    pub fn mode_for(&self, overscaled_z: u8) -> StencilMode {
        self.modes
            .iter()
            .find(|(z, _)| *z == overscaled_z)
            .map_or(StencilMode::Always, |(_, mode)| *mode)
    }
}

/// Per-frame values the host computes once and hands to the planner.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs {
    /// The host's monotonic clock, read once for the whole frame.
    pub now: HostTime,
    /// Zoom level the viewport would ideally render at.
    pub ideal_zoom: f64,
    /// Whether the map is still in its initial load (shorter fade window).
    pub is_initial_load: bool,
    /// Which pass the host is executing.
    pub pass: RenderPassKind,
    /// Tick→nanosecond conversion for the host clock.
    pub timebase: Timebase,
}

/// Host-side tile cache access.
///
/// Implemented by the host's source cache; also by test doubles, which is
/// how the planner is exercised without a map engine.
pub trait TileSource {
    /// The tiles currently intersecting the viewport, recomputed every
    /// frame.
    fn visible_tiles(&self) -> Vec<TileId>;

    /// Snapshot of one tile's state, or `None` if it is not in the cache.
    fn tile(&self, id: TileId) -> Option<TileState>;

    /// The nearest loaded tile at a coarser display zoom covering the same
    /// area, starting `min_depth` levels up (`0` = any ancestor, nearest
    /// first).
    fn find_loaded_ancestor(&self, id: TileId, min_depth: u8) -> Option<TileId>;

    /// Applies one per-tile write-back produced by planning.
    fn apply_update(&mut self, update: &TileUpdate);
}

/// Host camera access.
pub trait Camera {
    /// Projection matrix for one tile (unwrapped world position → clip
    /// space), column-major.
    fn tile_matrix(&self, id: TileId) -> [f32; 16];
}

/// The host's overlap-resolution policy.
pub trait OverlapPolicy {
    /// Computes the stencil configuration and draw order for the frame's
    /// visible set. Called once per frame before any draw is emitted.
    fn overlap_config(&self, visible: &[TileId]) -> OverlapConfig;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_policy_windows() {
        let tb = Timebase::NANOS;
        assert_eq!(fade_duration(true, tb), Duration::from_millis(100, tb));
        assert_eq!(fade_duration(false, tb), Duration::from_millis(400, tb));
    }

    #[test]
    fn overlap_config_defaults_to_always() {
        let config = OverlapConfig::unstenciled(&[TileId::new(0, 0, 2)]);
        assert_eq!(config.mode_for(2), StencilMode::Always);
    }

    #[test]
    fn overlap_config_mode_lookup() {
        let config = OverlapConfig {
            modes: alloc::vec![
                (3, StencilMode::Equal { reference: 7 }),
                (4, StencilMode::Equal { reference: 8 }),
            ],
            order: Vec::new(),
        };
        assert_eq!(config.mode_for(3), StencilMode::Equal { reference: 7 });
        assert_eq!(config.mode_for(4), StencilMode::Equal { reference: 8 });
        assert_eq!(config.mode_for(9), StencilMode::Always);
    }
}
