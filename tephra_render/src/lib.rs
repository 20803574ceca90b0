// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame planning and typed draw commands for the tephra raster overlay.
//!
//! This crate is the intermediate representation between [`tephra_core`]'s
//! tile/fade model and backend-specific rendering. It defines:
//!
//! - [`TileUniforms`] — the compile-time-checked uniform block shared with
//!   the GPU shader
//! - [`OverlayItem`] / [`OverlayPlan`] — one frame's ordered draw commands
//! - [`plan_frame`] — the per-frame compositor orchestration
//! - [`AlertOverlay`] — the layer facade the host holds

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod compose;
mod layer;
mod plan;
mod uniforms;

pub use compose::plan_frame;
pub use layer::{AlertOverlay, OverlayParams};
pub use plan::{OverlayItem, OverlayPlan};
pub use uniforms::{TileUniforms, UNIFORM_BLOCK_SIZE};
