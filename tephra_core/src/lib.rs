// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types and crossfade scheduling for tiled raster alert overlays.
//!
//! `tephra_core` provides the foundational pieces for drawing a time-varying
//! raster overlay (daily alert tiles) on top of a host map engine: tile
//! identity in the quad-tree pyramid, the deterministic crossfade scheduler
//! that blends a tile against its best loaded ancestor, and the per-texel
//! decoder that classifies packed multi-sensor agreement values into fixed
//! colors. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! The crate is consumed once per rendered frame by a planner that turns
//! host tile state into draw commands:
//!
//! ```text
//!   Host (visible tiles, ancestors, camera)
//!       │
//!       ▼
//!   FrameInputs ──► plan_frame() ──► OverlayPlan ──► GPU program
//!                        │                               │
//!                        │ compute_fade() per tile       │ decode per texel
//!                        ▼                               ▼
//!                   TileUpdate ──► TileSource::apply_update()
//! ```
//!
//! **[`tile`]** — Tile identity (`x`, `y`, zoom, overscaled zoom), the
//! host-owned per-tile view read each frame, and the explicit [`TileUpdate`]
//! value through which the only mutations flow.
//!
//! **[`pyramid`]** — Texture-space mapping from a tile's unit square into an
//! ancestor's texture, letting one coarse texture stand in for up to `4^k`
//! descendants.
//!
//! **[`fade`]** — The pure crossfade scheduler. A function of tile metadata
//! and an injected clock read; no hidden state, no I/O.
//!
//! **[`decode`]** — CPU reference for the packed alert encoding (day index +
//! sensor agreement bits) and its classification into fixed colors. The GPU
//! fragment stage mirrors this constant for constant.
//!
//! **[`host`]** — Traits the host map engine implements: tile enumeration
//! and ancestor lookup, per-tile projection matrices, and the opaque
//! overlap/stencil policy that prevents double-blending across zoom levels.
//!
//! **[`time`]** — Monotonic [`HostTime`](time::HostTime) ticks with rational
//! tick→nanosecond conversion. Fade ratios divide tick counts, so the
//! scheduler never needs to know the platform timebase.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! per-frame instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//!
//! [`TileUpdate`]: tile::TileUpdate

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod decode;
pub mod fade;
pub mod host;
pub mod pyramid;
pub mod tile;
pub mod time;
pub mod trace;
