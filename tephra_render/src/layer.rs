// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer facade the host holds between frames.
//!
//! [`AlertOverlay`] owns the two host-settable parameters — layer opacity
//! and the date range threaded to the decode stage — with a lazy-apply
//! contract: setters only store the value, and the next
//! [`plan_frame`](AlertOverlay::plan_frame) picks it up. No redraw is
//! triggered; the host's frame loop is the only driver.
//!
//! The facade is also where the frame entry is gated: the overlay draws
//! alpha-blended content, so planning during any pass other than the
//! translucent one leaves the plan empty.

use tephra_core::host::{Camera, DateRange, FrameInputs, OverlapPolicy, RenderPassKind, TileSource};
use tephra_core::trace::Tracer;

use crate::compose;
use crate::plan::OverlayPlan;

/// The layer parameters applied to every draw of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayParams {
    /// Layer-wide opacity in `[0, 1]`.
    pub opacity: f32,
    /// Date-range bounds threaded to the decode stage unchanged.
    pub date_range: DateRange,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            date_range: DateRange::default(),
        }
    }
}

/// The raster alert overlay layer.
///
/// One instance lives for the lifetime of the layer in the host's style;
/// all per-frame state is in the [`OverlayPlan`] the host passes in.
#[derive(Clone, Debug, Default)]
pub struct AlertOverlay {
    params: OverlayParams,
}

impl AlertOverlay {
    /// Creates an overlay with full opacity and an unset date range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an overlay with the given initial parameters.
    #[must_use]
    pub fn with_params(params: OverlayParams) -> Self {
        Self { params }
    }

    /// Updates the layer-wide opacity used by future frames. Lazy: no
    /// redraw is triggered.
    pub fn set_opacity(&mut self, value: f32) {
        self.params.opacity = value;
    }

    /// Updates the date-range bounds threaded into the decode stage. Lazy,
    /// like [`set_opacity`](Self::set_opacity). The bounds are not
    /// validated; `start <= end` is the caller's responsibility.
    pub fn set_date_range(&mut self, start_index: f32, end_index: f32) {
        self.params.date_range = DateRange {
            start_index,
            end_index,
        };
    }

    /// The parameters the next frame will use.
    #[must_use]
    pub fn params(&self) -> &OverlayParams {
        &self.params
    }

    /// Plans one frame and applies the resulting tile updates to `source`.
    ///
    /// A no-op (empty plan) outside the host's translucent pass. The
    /// updates — refresh-flag clears and fade registrations — are applied
    /// to the host cache before returning, so the scheduler's one side
    /// effect happens exactly once per frame.
    pub fn plan_frame<S, C, O>(
        &self,
        source: &mut S,
        camera: &C,
        overlap: &O,
        frame: &FrameInputs,
        tracer: &mut Tracer<'_>,
        plan: &mut OverlayPlan,
    ) where
        S: TileSource,
        C: Camera,
        O: OverlapPolicy,
    {
        if frame.pass != RenderPassKind::Translucent {
            plan.clear();
            return;
        }

        compose::plan_frame(&*source, camera, overlap, frame, &self.params, tracer, plan);

        for update in &plan.updates {
            source.apply_update(update);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use tephra_core::host::{OverlapConfig, StencilMode};
    use tephra_core::tile::{TextureKey, TileId, TileState, TileUpdate};
    use tephra_core::time::{HostTime, Timebase};

    use super::*;

    #[derive(Default)]
    struct OneTileCache {
        tile: Option<TileState>,
        applied: Vec<TileUpdate>,
    }

    impl TileSource for OneTileCache {
        fn visible_tiles(&self) -> Vec<TileId> {
            self.tile.iter().map(|t| t.id).collect()
        }

        fn tile(&self, id: TileId) -> Option<TileState> {
            self.tile.filter(|t| t.id == id)
        }

        fn find_loaded_ancestor(&self, _id: TileId, _min_depth: u8) -> Option<TileId> {
            None
        }

        fn apply_update(&mut self, update: &TileUpdate) {
            self.applied.push(*update);
            if update.clear_refreshed_flag {
                if let Some(tile) = &mut self.tile {
                    tile.refreshed_upon_expiration = false;
                }
            }
        }
    }

    struct IdentityCamera;

    impl Camera for IdentityCamera {
        fn tile_matrix(&self, _id: TileId) -> [f32; 16] {
            let mut m = [0.0; 16];
            m[0] = 1.0;
            m[5] = 1.0;
            m[10] = 1.0;
            m[15] = 1.0;
            m
        }
    }

    struct NoOverlap;

    impl OverlapPolicy for NoOverlap {
        fn overlap_config(&self, visible: &[TileId]) -> OverlapConfig {
            OverlapConfig::unstenciled(visible)
        }
    }

    fn cache_with_tile() -> OneTileCache {
        OneTileCache {
            tile: Some(TileState::new(
                TileId::new(0, 0, 3),
                HostTime(0),
                TextureKey(1),
            )),
            applied: Vec::new(),
        }
    }

    fn frame(pass: RenderPassKind) -> FrameInputs {
        FrameInputs {
            now: HostTime(1_000_000_000),
            ideal_zoom: 3.0,
            is_initial_load: false,
            pass,
            timebase: Timebase::NANOS,
        }
    }

    #[test]
    fn only_the_translucent_pass_draws() {
        let overlay = AlertOverlay::new();
        let mut cache = cache_with_tile();
        let mut plan = OverlayPlan::new();

        for pass in [RenderPassKind::Opaque, RenderPassKind::Offscreen] {
            overlay.plan_frame(
                &mut cache,
                &IdentityCamera,
                &NoOverlap,
                &frame(pass),
                &mut Tracer::none(),
                &mut plan,
            );
            assert!(plan.is_empty(), "{pass:?} must not draw");
            assert!(cache.applied.is_empty(), "{pass:?} must not mutate tiles");
        }

        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Translucent),
            &mut Tracer::none(),
            &mut plan,
        );
        assert_eq!(plan.items.len(), 1);
        assert_eq!(cache.applied.len(), 1);
    }

    #[test]
    fn wrong_pass_clears_a_stale_plan() {
        let overlay = AlertOverlay::new();
        let mut cache = cache_with_tile();
        let mut plan = OverlayPlan::new();

        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Translucent),
            &mut Tracer::none(),
            &mut plan,
        );
        assert!(!plan.is_empty());

        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Opaque),
            &mut Tracer::none(),
            &mut plan,
        );
        assert!(plan.is_empty(), "stale items must not leak into a later pass");
    }

    #[test]
    fn setters_apply_lazily_on_the_next_frame() {
        let mut overlay = AlertOverlay::new();
        let mut cache = cache_with_tile();
        let mut plan = OverlayPlan::new();

        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Translucent),
            &mut Tracer::none(),
            &mut plan,
        );
        assert_eq!(plan.items[0].uniforms.layer_opacity, 1.0);

        overlay.set_opacity(0.4);
        overlay.set_date_range(10.0, 42.0);

        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Translucent),
            &mut Tracer::none(),
            &mut plan,
        );
        let u = &plan.items[0].uniforms;
        assert_eq!(u.layer_opacity, 0.4);
        assert_eq!(u.date_start, 10.0);
        assert_eq!(u.date_end, 42.0);
    }

    #[test]
    fn refreshed_flag_round_trips_through_the_host() {
        let mut overlay = AlertOverlay::new();
        overlay.set_opacity(1.0);
        let mut cache = cache_with_tile();
        if let Some(tile) = &mut cache.tile {
            tile.refreshed_upon_expiration = true;
        }
        let mut plan = OverlayPlan::new();

        // Well past the fade window: the plan clears the flag via the host.
        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Translucent),
            &mut Tracer::none(),
            &mut plan,
        );
        assert!(cache.applied[0].clear_refreshed_flag);
        assert!(!cache.tile.unwrap().refreshed_upon_expiration);
    }

    #[test]
    fn stencil_defaults_to_always_without_policy_modes() {
        let overlay = AlertOverlay::new();
        let mut cache = cache_with_tile();
        let mut plan = OverlayPlan::new();
        overlay.plan_frame(
            &mut cache,
            &IdentityCamera,
            &NoOverlap,
            &frame(RenderPassKind::Translucent),
            &mut Tracer::none(),
            &mut plan,
        );
        assert_eq!(plan.items[0].stencil, StencilMode::Always);
    }
}
