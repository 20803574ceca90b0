// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tile uniform block.
//!
//! Every parameter the shader consumes is a named, typed field here rather
//! than a string-keyed uniform location resolved at runtime. The layout is
//! `#[repr(C)]` and mirrors the WGSL `TileUniforms` struct field for field;
//! [`UNIFORM_BLOCK_SIZE`] is asserted at compile time and declared as the
//! binding's minimum size, so a drift between the two structs fails pipeline
//! validation at initialization instead of rendering garbage.

use bytemuck::{Pod, Zeroable};

/// Size of [`TileUniforms`] in bytes. Must match the WGSL struct.
pub const UNIFORM_BLOCK_SIZE: u64 = 96;

/// Per-tile shader parameters for one draw.
///
/// Field order matters: it is the WGSL layout. `mat4x4<f32>` occupies the
/// first 64 bytes; the `vec2<f32>` lands on an 8-byte boundary at offset 64;
/// the six scalars pack the remaining 24 bytes, leaving the struct a
/// 16-byte-aligned 96 bytes with no implicit padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TileUniforms {
    /// Tile projection matrix (unwrapped world → clip), column-major.
    pub matrix: [f32; 16],
    /// Top-left of the tile's window inside the ancestor texture.
    pub ancestor_offset: [f32; 2],
    /// Uniform scale into the ancestor texture.
    pub ancestor_scale: f32,
    /// Final alpha multiplier for the tile's layer.
    pub fade_opacity: f32,
    /// Interpolation weight toward the ancestor's sample.
    pub fade_mix: f32,
    /// Layer-wide opacity set by the host.
    pub layer_opacity: f32,
    /// First day index of the host's date-range filter.
    pub date_start: f32,
    /// Last day index of the host's date-range filter.
    pub date_end: f32,
}

const _: () = assert!(
    core::mem::size_of::<TileUniforms>() as u64 == UNIFORM_BLOCK_SIZE,
    "uniform block layout drifted from the WGSL struct"
);
const _: () = assert!(
    core::mem::align_of::<TileUniforms>() <= 16,
    "uniform block must satisfy WGSL struct alignment"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_pod_roundtrippable() {
        let u = TileUniforms {
            matrix: [0.5; 16],
            ancestor_offset: [0.25, 0.75],
            ancestor_scale: 0.5,
            fade_opacity: 1.0,
            fade_mix: 0.25,
            layer_opacity: 0.8,
            date_start: 100.0,
            date_end: 200.0,
        };
        let bytes = bytemuck::bytes_of(&u);
        assert_eq!(bytes.len() as u64, UNIFORM_BLOCK_SIZE);
        let back: TileUniforms = bytemuck::pod_read_unaligned(bytes);
        assert_eq!(back, u);
    }

    #[test]
    fn scalar_fields_follow_the_vec2() {
        // Offsets pinned against the WGSL layout: matrix 0..64, vec2 64..72,
        // then six tightly packed scalars.
        let u = TileUniforms {
            matrix: [0.0; 16],
            ancestor_offset: [1.0, 2.0],
            ancestor_scale: 3.0,
            fade_opacity: 4.0,
            fade_mix: 5.0,
            layer_opacity: 6.0,
            date_start: 7.0,
            date_end: 8.0,
        };
        let words: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(&words[16..24], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }
}
