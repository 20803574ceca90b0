// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame compositor orchestration.
//!
//! [`plan_frame`] walks the host's visible set once and emits one draw item
//! per ready tile:
//!
//! 1. Ask the host's overlap policy for the frame's stencil configuration
//!    and draw order.
//! 2. Skip tiles whose texture is not yet uploaded — not an error, the tile
//!    is retried next frame.
//! 3. Resolve the nearest loaded ancestor and the texture-space mapping
//!    into it.
//! 4. Run the fade scheduler with the frame's fade window and record the
//!    resulting [`TileUpdate`].
//! 5. Fill the typed uniform block and emit the item.
//!
//! The planner reads the host through `&` only; every mutation it wants is
//! in [`OverlayPlan::updates`], which the caller applies afterwards.

use tephra_core::fade::compute_fade;
use tephra_core::host::{fade_duration, Camera, FrameInputs, OverlapPolicy, TileSource};
use tephra_core::pyramid::AncestorUv;
use tephra_core::tile::TileUpdate;
use tephra_core::trace::{FadeEvent, PlanBeginEvent, PlanEndEvent, TileSkippedEvent, Tracer};

use crate::layer::OverlayParams;
use crate::plan::{OverlayItem, OverlayPlan};
use crate::uniforms::TileUniforms;

/// Plans one frame of the overlay into `plan`.
///
/// `plan` is cleared first and reused to avoid per-frame allocation once its
/// buffers have grown. Iteration follows the overlap policy's order; the
/// host's stencil configuration is what keeps overlapping pyramid depths
/// from double-blending, not the order itself.
pub fn plan_frame<S, C, O>(
    source: &S,
    camera: &C,
    overlap: &O,
    frame: &FrameInputs,
    params: &OverlayParams,
    tracer: &mut Tracer<'_>,
    plan: &mut OverlayPlan,
) where
    S: TileSource,
    C: Camera,
    O: OverlapPolicy,
{
    plan.clear();

    let visible = source.visible_tiles();
    tracer.plan_begin(&PlanBeginEvent {
        now: frame.now,
        ideal_zoom: frame.ideal_zoom,
        visible: visible.len(),
    });
    if visible.is_empty() {
        tracer.plan_end(&PlanEndEvent {
            items: 0,
            updates: 0,
        });
        return;
    }

    let config = overlap.overlap_config(&visible);
    let window = fade_duration(frame.is_initial_load, frame.timebase);

    for &id in &config.order {
        let Some(tile) = source.tile(id) else {
            continue;
        };
        let Some(texture) = tile.texture else {
            tracer.tile_skipped(&TileSkippedEvent { id });
            continue;
        };

        // Ancestors are looked up fresh each frame: the loaded set changes
        // asynchronously and yesterday's ancestor may be gone today.
        let ancestor = source
            .find_loaded_ancestor(id, 0)
            .and_then(|aid| source.tile(aid))
            .filter(|a| a.is_ready());

        let outcome = compute_fade(&tile, ancestor.as_ref(), frame.ideal_zoom, window, frame.now);
        plan.updates.push(TileUpdate {
            id,
            clear_refreshed_flag: outcome.clear_refreshed_flag,
            registered_fade: window,
        });

        let (uv, secondary) = if let Some(a) = &ancestor {
            // The `is_ready` filter above guarantees the texture.
            (AncestorUv::between(id, a.id), a.texture.unwrap_or(texture))
        } else {
            // No ancestor: the secondary binding falls back to the tile's
            // own texture, which is what the decode stage classifies.
            (AncestorUv::IDENTITY, texture)
        };

        tracer.fade(&FadeEvent {
            id,
            ancestor: ancestor.as_ref().map(|a| a.id),
            opacity: outcome.fade.opacity,
            mix: outcome.fade.mix,
        });

        plan.items.push(OverlayItem {
            tile: id,
            texture,
            secondary,
            stencil: config.mode_for(id.overscaled_z),
            uniforms: TileUniforms {
                matrix: camera.tile_matrix(id),
                ancestor_offset: uv.offset,
                ancestor_scale: uv.scale,
                fade_opacity: outcome.fade.opacity,
                fade_mix: outcome.fade.mix,
                layer_opacity: params.opacity,
                date_start: params.date_range.start_index,
                date_end: params.date_range.end_index,
            },
        });
    }

    tracer.plan_end(&PlanEndEvent {
        items: plan.items.len(),
        updates: plan.updates.len(),
    });
}
