// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile identity and the host-owned per-tile view.
//!
//! Tiles live in the host's tile cache; this crate only reads them. The one
//! piece of state the overlay writes back — clearing
//! [`refreshed_upon_expiration`](TileState::refreshed_upon_expiration) and
//! recording the fade window a tile was last computed with — flows through an
//! explicit [`TileUpdate`] value that the host applies via
//! [`TileSource::apply_update`](crate::host::TileSource::apply_update),
//! keeping the fade scheduler itself pure.

use core::fmt;

use crate::time::{Duration, HostTime};

/// Identifies a tile's position in the quad-tree pyramid.
///
/// `x`/`y` are the canonical tile coordinates at data zoom `z`.
/// `overscaled_z >= z` is the zoom the tile is *displayed* at: when the
/// viewport zooms past the source's maximum zoom, the same data is reused at
/// higher apparent resolution and only `overscaled_z` keeps increasing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Canonical column at zoom `z`.
    pub x: u32,
    /// Canonical row at zoom `z`.
    pub y: u32,
    /// Zoom level the tile's data was loaded at.
    pub z: u8,
    /// Zoom level the tile is displayed at (`>= z`).
    pub overscaled_z: u8,
}

impl TileId {
    /// Creates a tile id displayed at its own data zoom.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u8) -> Self {
        Self {
            x,
            y,
            z,
            overscaled_z: z,
        }
    }

    /// Creates a tile id displayed at a finer zoom than its data zoom.
    #[inline]
    #[must_use]
    pub const fn overscaled(x: u32, y: u32, z: u8, overscaled_z: u8) -> Self {
        debug_assert!(overscaled_z >= z, "display zoom must not be coarser than data zoom");
        Self {
            x,
            y,
            z,
            overscaled_z,
        }
    }
}

impl fmt::Debug for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overscaled_z == self.z {
            write!(f, "TileId({}/{}/{})", self.z, self.x, self.y)
        } else {
            write!(
                f,
                "TileId({}/{}/{}@{})",
                self.z, self.x, self.y, self.overscaled_z
            )
        }
    }
}

/// An opaque reference to a tile texture owned by the host.
///
/// Textures are uploaded and destroyed by the host's tile cache; the overlay
/// passes keys through to the GPU backend, which resolves them to views.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey(pub u64);

impl fmt::Debug for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureKey({})", self.0)
    }
}

/// Per-tile state read by the planner each frame.
///
/// Constructed by the host from its cache entry. All fields are snapshots;
/// the planner never holds one across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileState {
    /// Position in the pyramid.
    pub id: TileId,
    /// Host clock reading when the tile's texture became ready.
    pub time_added: HostTime,
    /// Texture handle, or `None` while the upload is still pending.
    pub texture: Option<TextureKey>,
    /// True when the tile's content is unchanged from a prior expired
    /// version. Suppresses the crossfade; cleared (via [`TileUpdate`]) once
    /// the fade window has elapsed.
    pub refreshed_upon_expiration: bool,
    /// The fade window this tile was last computed with, if any.
    pub registered_fade: Option<Duration>,
}

impl TileState {
    /// Creates a tile state with a ready texture and no refresh flag.
    #[must_use]
    pub const fn new(id: TileId, time_added: HostTime, texture: TextureKey) -> Self {
        Self {
            id,
            time_added,
            texture: Some(texture),
            refreshed_upon_expiration: false,
            registered_fade: None,
        }
    }

    /// Whether the tile's texture is uploaded and drawable this frame.
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.texture.is_some()
    }
}

/// The per-tile write-back produced by one planning pass.
///
/// One update is emitted for every tile the fade scheduler ran on. The host
/// applies it between frames; nothing else in the overlay mutates tile
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileUpdate {
    /// The tile this update applies to.
    pub id: TileId,
    /// Clear [`TileState::refreshed_upon_expiration`]: the transition window
    /// elapsed and future refreshes must crossfade normally.
    pub clear_refreshed_flag: bool,
    /// The fade window the tile was computed with this frame.
    pub registered_fade: Duration,
}
