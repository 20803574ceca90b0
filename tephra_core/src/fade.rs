// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossfade scheduling between a tile and its loaded ancestor.
//!
//! As tiles arrive asynchronously and out of order, every visible tile is
//! blended against the nearest loaded ancestor covering the same area so
//! resolution changes never pop. [`compute_fade`] is a pure function of the
//! tile metadata and one injected clock reading: given identical inputs it
//! always produces the identical [`FadeOutcome`], which is what makes the
//! scheduler testable frame by frame.
//!
//! # Direction
//!
//! The scheduler fades the tile **in** when it has no ancestor, or when the
//! ancestor's display zoom is farther from the viewport's ideal zoom than
//! the tile's own — the tile is the better-resolution choice and should
//! become dominant. Otherwise it fades **out**: the ancestor stays dominant
//! while the tile's content is still settling.
//!
//! # The refreshed-upon-expiration flag
//!
//! A tile refreshed with byte-identical content after its data expired must
//! not crossfade (there is nothing to transition to), so its opacity clamps
//! to 1 immediately. Once the tile is old enough to have passed the fade
//! window the flag must be cleared — otherwise a later zoom would also skip
//! its crossfade. The clear is reported as a bit on the outcome rather than
//! performed here; the planner folds it into the frame's
//! [`TileUpdate`](crate::tile::TileUpdate)s.

use crate::pyramid::zoom_distance;
use crate::time::{Duration, HostTime};
use crate::tile::TileState;

/// Blend weights for one tile for one frame.
///
/// Ephemeral: recomputed every frame, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeResult {
    /// Final alpha multiplier for the tile's own layer, in `[0, 1]`.
    pub opacity: f32,
    /// Interpolation weight toward the ancestor's sampled color, in
    /// `[0, 1]`. `0` = pure tile, `1` = pure ancestor. Forced to `0` when no
    /// ancestor is loaded.
    pub mix: f32,
}

impl FadeResult {
    /// Fully opaque, no ancestor blend. The result when fading is disabled.
    pub const OPAQUE: Self = Self {
        opacity: 1.0,
        mix: 0.0,
    };
}

/// A [`FadeResult`] plus the scheduler's one requested side effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeOutcome {
    /// The blend weights for this frame.
    pub fade: FadeResult,
    /// The tile's `refreshed_upon_expiration` flag should be cleared: its
    /// transition window has elapsed.
    pub clear_refreshed_flag: bool,
}

/// Computes the crossfade between `tile` and `ancestor` at time `now`.
///
/// `ideal_zoom` is the zoom level the viewport would ideally render at,
/// supplied by the host's camera transform. `fade_duration` is the host's
/// current fade policy window; a zero duration disables fading entirely and
/// yields [`FadeResult::OPAQUE`] with no flag clear.
///
/// Pure and deterministic: `now` is the single clock reading used anywhere
/// in the computation.
#[must_use]
pub fn compute_fade(
    tile: &TileState,
    ancestor: Option<&TileState>,
    ideal_zoom: f64,
    fade_duration: Duration,
    now: HostTime,
) -> FadeOutcome {
    if fade_duration.is_zero() {
        return FadeOutcome {
            fade: FadeResult::OPAQUE,
            clear_refreshed_flag: false,
        };
    }

    let window = fade_duration.ticks() as f64;
    let since_tile = now.saturating_duration_since(tile.time_added).ticks() as f64 / window;
    // -1 is the "no ancestor" sentinel; the fade-out arm is unreachable in
    // that case so the value only matters for symmetry with the ratio below.
    let since_ancestor = ancestor.map_or(-1.0, |a| {
        now.saturating_duration_since(a.time_added).ticks() as f64 / window
    });

    let fade_in = match ancestor {
        None => true,
        Some(a) => {
            zoom_distance(a.id.overscaled_z, ideal_zoom)
                > zoom_distance(tile.id.overscaled_z, ideal_zoom)
        }
    };

    let child_opacity = if fade_in && tile.refreshed_upon_expiration {
        1.0
    } else {
        let raw = if fade_in {
            since_tile
        } else {
            1.0 - since_ancestor
        };
        raw.clamp(0.0, 1.0)
    };

    let clear_refreshed_flag = tile.refreshed_upon_expiration && since_tile >= 1.0;

    #[expect(
        clippy::cast_possible_truncation,
        reason = "child_opacity is clamped to [0, 1]; f32 is the GPU-facing precision"
    )]
    let child_opacity = child_opacity as f32;

    let fade = if ancestor.is_some() {
        // Always draw the tile at full alpha and blend its color toward the
        // ancestor's sample.
        FadeResult {
            opacity: 1.0,
            mix: 1.0 - child_opacity,
        }
    } else {
        // Nothing to blend toward: the tile fades against the base map.
        FadeResult {
            opacity: child_opacity,
            mix: 0.0,
        }
    };

    FadeOutcome {
        fade,
        clear_refreshed_flag,
    }
}
