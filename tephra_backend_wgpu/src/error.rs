// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fatal initialization errors.

use thiserror::Error;

/// A shader or pipeline failed validation while building the overlay
/// program.
///
/// These are initialization-time failures: the program is unusable and the
/// caller must not attempt to draw with it. The variants name the stage
/// that failed so a broken deployment is diagnosable from the error alone.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// The WGSL module failed to compile.
    #[error("overlay shader failed to compile: {0}")]
    Shader(wgpu::Error),

    /// A render pipeline failed to build against the compiled module.
    #[error("overlay {stage} pipeline failed to build: {source}")]
    Pipeline {
        /// Which pipeline variant failed (`"unstenciled"` or `"stenciled"`).
        stage: &'static str,
        /// The underlying validation error.
        source: wgpu::Error,
    },
}
