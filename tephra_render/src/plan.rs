// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay plan: an ordered sequence of draw items for one frame.

use alloc::vec::Vec;

use tephra_core::host::StencilMode;
use tephra_core::tile::{TextureKey, TileId, TileUpdate};

use crate::uniforms::TileUniforms;

/// A single draw command in the overlay plan.
///
/// Items are produced in the host overlap policy's draw order. Each draw
/// binds two textures: the tile's own and a secondary that is either the
/// ancestor being crossfaded from or, when no ancestor is loaded, the tile's
/// own texture again (the decode stage classifies the secondary sample).
#[derive(Clone, Copy, Debug)]
pub struct OverlayItem {
    /// The tile this item draws.
    pub tile: TileId,
    /// The tile's own texture (primary binding).
    pub texture: TextureKey,
    /// Ancestor texture, or the tile's own when no ancestor is loaded
    /// (secondary binding).
    pub secondary: TextureKey,
    /// Stencil mode assigned by the host's overlap policy.
    pub stencil: StencilMode,
    /// The typed uniform block for this draw.
    pub uniforms: TileUniforms,
}

/// An ordered list of draw commands for a single frame, plus the per-tile
/// write-backs the frame produced.
///
/// Backends translate the items into GPU draw calls; the layer facade hands
/// the updates back to the host's tile cache.
#[derive(Clone, Debug, Default)]
pub struct OverlayPlan {
    /// Draw items in the host's overlap order.
    pub items: Vec<OverlayItem>,
    /// Flag clears and fade registrations for the tiles that were planned.
    pub updates: Vec<TileUpdate>,
}

impl OverlayPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updates.clear();
    }

    /// Whether the plan draws anything this frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
