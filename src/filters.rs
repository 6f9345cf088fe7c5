// SPDX-License-Identifier: GPL-3.0-only

//! Color-matrix photo filters
//!
//! Every filter is a 4×5 row-major color matrix: four rows (R, G, B, A),
//! each holding four channel weights followed by an additive offset.
//! Channels are normalized to `0.0..=1.0` before the matrix is applied and
//! offsets are expressed in the same normalized units.
//!
//! The CPU implementation here is the reference; the GPU compute path in
//! [`crate::shaders`] evaluates the same matrix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 4×5 row-major color matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [f32; 20]);

impl ColorMatrix {
    /// Leaves every pixel unchanged
    pub const IDENTITY: ColorMatrix = ColorMatrix([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    pub const SEPIA: ColorMatrix = ColorMatrix([
        0.393, 0.769, 0.189, 0.0, 0.0, //
        0.349, 0.686, 0.168, 0.0, 0.0, //
        0.272, 0.534, 0.131, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    /// Rec. 709 luma on every color channel
    pub const GRAYSCALE: ColorMatrix = ColorMatrix([
        0.2126, 0.7152, 0.0722, 0.0, 0.0, //
        0.2126, 0.7152, 0.0722, 0.0, 0.0, //
        0.2126, 0.7152, 0.0722, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    pub const VINTAGE: ColorMatrix = ColorMatrix([
        0.627_934_56,
        0.320_218_35,
        -0.039_654_08,
        0.0,
        9.651_286 / 255.0,
        0.025_783_977,
        0.644_118_9,
        0.032_591_276,
        0.0,
        7.462_829 / 255.0,
        0.046_605_557,
        -0.085_123_3,
        0.524_164_8,
        0.0,
        5.159_190_6 / 255.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]);

    /// Channel weights of each output row (R, G, B, A)
    pub fn rows(&self) -> [[f32; 4]; 4] {
        let m = &self.0;
        [
            [m[0], m[1], m[2], m[3]],
            [m[5], m[6], m[7], m[8]],
            [m[10], m[11], m[12], m[13]],
            [m[15], m[16], m[17], m[18]],
        ]
    }

    /// Additive offsets of each output row (R, G, B, A)
    pub fn offsets(&self) -> [f32; 4] {
        let m = &self.0;
        [m[4], m[9], m[14], m[19]]
    }

    /// Transform a single RGBA pixel
    pub fn apply_to_pixel(&self, pixel: [u8; 4]) -> [u8; 4] {
        let input = pixel.map(|c| c as f32 / 255.0);
        let rows = self.rows();
        let offsets = self.offsets();

        let mut out = [0u8; 4];
        for (channel, (row, offset)) in rows.iter().zip(offsets).enumerate() {
            let value = row
                .iter()
                .zip(input.iter())
                .map(|(weight, component)| weight * component)
                .sum::<f32>()
                + offset;
            out[channel] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        out
    }

    /// Transform a tightly packed RGBA buffer in place
    pub fn apply_rgba(&self, rgba: &mut [u8]) {
        if *self == Self::IDENTITY {
            return;
        }
        for pixel in rgba.chunks_exact_mut(4) {
            let [r, g, b, a] = self.apply_to_pixel([pixel[0], pixel[1], pixel[2], pixel[3]]);
            pixel.copy_from_slice(&[r, g, b, a]);
        }
    }
}

/// Filters offered in the preview screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterType {
    #[default]
    Normal,
    Sepia,
    Grayscale,
    Vintage,
}

impl FilterType {
    /// All filters in display order
    pub const ALL: [FilterType; 4] = [
        FilterType::Normal,
        FilterType::Sepia,
        FilterType::Grayscale,
        FilterType::Vintage,
    ];

    /// Matrix implementing this filter
    pub fn matrix(&self) -> ColorMatrix {
        match self {
            FilterType::Normal => ColorMatrix::IDENTITY,
            FilterType::Sepia => ColorMatrix::SEPIA,
            FilterType::Grayscale => ColorMatrix::GRAYSCALE,
            FilterType::Vintage => ColorMatrix::VINTAGE,
        }
    }

    /// Stable lowercase identifier (CLI argument, logs)
    pub fn name(&self) -> &'static str {
        match self {
            FilterType::Normal => "normal",
            FilterType::Sepia => "sepia",
            FilterType::Grayscale => "grayscale",
            FilterType::Vintage => "vintage",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|filter| filter.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown filter '{}' (expected one of: normal, sepia, grayscale, vintage)",
                    s
                )
            })
    }
}

/// Apply a filter to a tightly packed RGBA buffer on the CPU
pub fn apply_filter_cpu(rgba: &[u8], filter: FilterType) -> Vec<u8> {
    let mut output = rgba.to_vec();
    filter.matrix().apply_rgba(&mut output);
    output
}
