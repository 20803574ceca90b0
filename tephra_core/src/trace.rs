// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the planning loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the planner calls at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::tile::TileId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when planning begins for a frame.
#[derive(Clone, Copy, Debug)]
pub struct PlanBeginEvent {
    /// The frame's clock reading.
    pub now: HostTime,
    /// The viewport's ideal zoom level.
    pub ideal_zoom: f64,
    /// Number of visible tiles the host enumerated.
    pub visible: usize,
}

/// Emitted when a visible tile is skipped because its texture is not ready.
#[derive(Clone, Copy, Debug)]
pub struct TileSkippedEvent {
    /// The skipped tile.
    pub id: TileId,
}

/// Emitted after the fade scheduler runs for one tile.
#[derive(Clone, Copy, Debug)]
pub struct FadeEvent {
    /// The tile being composited.
    pub id: TileId,
    /// The resolved ancestor, if one was loaded.
    pub ancestor: Option<TileId>,
    /// Final alpha multiplier for the tile's layer.
    pub opacity: f32,
    /// Interpolation weight toward the ancestor's sample.
    pub mix: f32,
}

/// Emitted when planning ends for a frame.
#[derive(Clone, Copy, Debug)]
pub struct PlanEndEvent {
    /// Draw items emitted.
    pub items: usize,
    /// Tile updates emitted (flag clears and fade registrations).
    pub updates: usize,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receives planning events. All methods default to no-ops.
pub trait TraceSink {
    /// Called when planning begins for a frame.
    fn on_plan_begin(&mut self, e: &PlanBeginEvent) {
        _ = e;
    }

    /// Called when a visible tile is skipped (texture not ready).
    fn on_tile_skipped(&mut self, e: &TileSkippedEvent) {
        _ = e;
    }

    /// Called after the fade scheduler runs for one tile.
    fn on_fade(&mut self, e: &FadeEvent) {
        _ = e;
    }

    /// Called when planning ends for a frame.
    fn on_plan_end(&mut self, e: &PlanEndEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PlanBeginEvent`].
    #[inline]
    pub fn plan_begin(&mut self, e: &PlanBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_plan_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TileSkippedEvent`].
    #[inline]
    pub fn tile_skipped(&mut self, e: &TileSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FadeEvent`].
    #[inline]
    pub fn fade(&mut self, e: &FadeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_fade(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlanEndEvent`].
    #[inline]
    pub fn plan_end(&mut self, e: &PlanEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_plan_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
