// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! wgpu GPU program for the tephra raster overlay.
//!
//! The overlay is a guest inside a host render pass: the host owns the
//! device, queue, surface, depth/stencil attachment, and every tile
//! texture. This crate provides:
//!
//! - [`OverlayProgram`] — pipelines + static resources, built once with
//!   validation errors surfaced as [`ProgramError`] (a shader or pipeline
//!   failure is fatal; the overlay refuses to proceed rather than silently
//!   rendering nothing)
//! - [`TextureSource`] — how the host resolves
//!   [`TextureKey`](tephra_core::tile::TextureKey)s to texture views
//! - a per-frame prepare/draw split: [`OverlayProgram::prepare`] uploads
//!   uniforms and builds bind groups outside the pass,
//!   [`OverlayProgram::draw`] records the draws into it

mod error;
mod program;

pub use error::ProgramError;
pub use program::{OverlayProgram, PreparedOverlay, ProgramConfig, TextureSource};
