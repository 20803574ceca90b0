// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding and classification of packed alert texels.
//!
//! Each texel of an alert tile packs a detection date and a multi-sensor
//! agreement bitfield into its RGBA channels:
//!
//! - `day_index = r * 255 + g` — days since the dataset epoch (the red
//!   channel carries the high byte at a 255 radix).
//! - `agreement = a` — which of the independent detection systems flagged
//!   the pixel, two bits per system starting at bit 2: `01` low confidence,
//!   `10` high confidence.
//!
//! A single-system detection therefore yields an agreement value that is
//! exactly one power of two: `4`, `16`, or `64` for low confidence, `8`,
//! `32`, or `128` for high. Any other nonzero value means several systems
//! agree. Zero means no detection and the texel is dropped entirely.
//!
//! This module is the CPU reference for the classification; the WGSL
//! fragment stage in the wgpu backend mirrors it constant for constant, and
//! the tests here pin the contract for both. Classification is per-texel
//! with no cross-pixel state.

/// Classification of a nonzero agreement value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlertClass {
    /// Exactly one system detected, at low confidence (`4`, `16`, `64`).
    LowConfidence,
    /// Exactly one system detected, at high confidence (`8`, `32`, `128`).
    HighConfidence,
    /// More than one system flagged the pixel.
    MultiSensor,
}

impl AlertClass {
    /// Display color for this class, RGB in `0..=255`. Alpha is always
    /// forced to 1 — the encoded intensity is deliberately not used to
    /// modulate the final pixel.
    #[must_use]
    pub const fn color(self) -> [u8; 3] {
        match self {
            Self::LowConfidence => [237, 164, 194],
            Self::HighConfidence => [220, 102, 153],
            Self::MultiSensor => [201, 42, 109],
        }
    }

    /// Display color as normalized RGBA, alpha forced to 1.
    #[must_use]
    pub const fn color_f32(self) -> [f32; 4] {
        let [r, g, b] = self.color();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ]
    }

    /// Short label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowConfidence => "low",
            Self::HighConfidence => "high",
            Self::MultiSensor => "multi",
        }
    }
}

/// Classifies an agreement value, or `None` for no detection.
#[must_use]
pub const fn classify_agreement(agreement: u8) -> Option<AlertClass> {
    match agreement {
        0 => None,
        4 | 16 | 64 => Some(AlertClass::LowConfidence),
        8 | 32 | 128 => Some(AlertClass::HighConfidence),
        _ => Some(AlertClass::MultiSensor),
    }
}

/// The day index packed into the red/green channels.
#[inline]
#[must_use]
pub const fn day_index(r: u8, g: u8) -> u32 {
    r as u32 * 255 + g as u32
}

/// A decoded alert texel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedTexel {
    /// Days since the dataset epoch.
    pub day_index: u32,
    /// Raw agreement bitfield from the alpha channel.
    pub agreement: u8,
}

impl DecodedTexel {
    /// Classification of this texel, or `None` when it carries no detection.
    #[inline]
    #[must_use]
    pub const fn class(self) -> Option<AlertClass> {
        classify_agreement(self.agreement)
    }
}

/// Decodes a raw RGBA texel. The blue channel carries a packed
/// confidence/intensity pair that the classification does not consume.
#[inline]
#[must_use]
pub const fn decode_texel(rgba: [u8; 4]) -> DecodedTexel {
    DecodedTexel {
        day_index: day_index(rgba[0], rgba[1]),
        agreement: rgba[3],
    }
}

/// Shades a raw texel to its final display color, or `None` when the texel
/// is dropped (no detection; the base map shows through).
#[must_use]
pub const fn shade_texel(rgba: [u8; 4]) -> Option<[u8; 4]> {
    match classify_agreement(rgba[3]) {
        None => None,
        Some(class) => {
            let [r, g, b] = class.color();
            Some([r, g, b, 255])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_agreement_is_dropped() {
        assert_eq!(classify_agreement(0), None);
        assert_eq!(shade_texel([10, 20, 30, 0]), None);
    }

    #[test]
    fn single_system_low_confidence_values() {
        for v in [4_u8, 16, 64] {
            assert_eq!(
                classify_agreement(v),
                Some(AlertClass::LowConfidence),
                "agreement={v}"
            );
        }
    }

    #[test]
    fn single_system_high_confidence_values() {
        for v in [8_u8, 32, 128] {
            assert_eq!(
                classify_agreement(v),
                Some(AlertClass::HighConfidence),
                "agreement={v}"
            );
        }
    }

    #[test]
    fn every_other_nonzero_value_is_multi_sensor() {
        for v in 1..=u8::MAX {
            if matches!(v, 4 | 16 | 64 | 8 | 32 | 128) {
                continue;
            }
            assert_eq!(
                classify_agreement(v),
                Some(AlertClass::MultiSensor),
                "agreement={v}"
            );
        }
    }

    #[test]
    fn combined_detections_classify_as_multi() {
        // Low-conf system A + high-conf system B: 4 | 32.
        assert_eq!(classify_agreement(4 | 32), Some(AlertClass::MultiSensor));
        // All three systems at high confidence.
        assert_eq!(
            classify_agreement(8 | 32 | 128),
            Some(AlertClass::MultiSensor)
        );
    }

    #[test]
    fn classified_texels_are_fully_opaque() {
        assert_eq!(shade_texel([0, 0, 0, 32]), Some([220, 102, 153, 255]));
        assert_eq!(shade_texel([0, 0, 0, 4]), Some([237, 164, 194, 255]));
        assert_eq!(shade_texel([0, 0, 0, 36]), Some([201, 42, 109, 255]));
    }

    #[test]
    fn day_index_uses_255_radix() {
        // The high byte counts in units of 255, not 256.
        assert_eq!(day_index(0, 0), 0);
        assert_eq!(day_index(0, 200), 200);
        assert_eq!(day_index(1, 0), 255);
        assert_eq!(day_index(2, 10), 520);
    }

    #[test]
    fn decode_reads_the_right_channels() {
        let texel = decode_texel([3, 7, 99, 16]);
        assert_eq!(texel.day_index, 3 * 255 + 7);
        assert_eq!(texel.agreement, 16);
        assert_eq!(texel.class(), Some(AlertClass::LowConfidence));
    }

    #[test]
    fn colors_match_the_published_palette() {
        assert_eq!(AlertClass::LowConfidence.color(), [237, 164, 194]);
        assert_eq!(AlertClass::HighConfidence.color(), [220, 102, 153]);
        assert_eq!(AlertClass::MultiSensor.color(), [201, 42, 109]);

        let [r, g, b, a] = AlertClass::MultiSensor.color_f32();
        assert!((r - 201.0 / 255.0).abs() < 1e-6);
        assert!((g - 42.0 / 255.0).abs() < 1e-6);
        assert!((b - 109.0 / 255.0).abs() < 1e-6);
        assert_eq!(a, 1.0);
    }
}
