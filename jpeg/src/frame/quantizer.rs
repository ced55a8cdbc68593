// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::coeff_order::{NATURAL_TO_ZIGZAG, ZIGZAG_TO_NATURAL};
use crate::BLOCK_SIZE;
use crate::error::{Error, Result};

// Quantized values are kept within what baseline Huffman categories allow.
const MAX_LEVEL: f32 = 1023.0;
const MIN_LEVEL: f32 = -1024.0;

/// Quantization factors, indexed by zig-zag position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    values: [u16; BLOCK_SIZE],
}

impl QuantizationTable {
    /// Builds a table from factors in zig-zag order, as stored in DQT.
    pub fn new(values: [u16; BLOCK_SIZE]) -> Result<QuantizationTable> {
        if let Some(pos) = values.iter().position(|&q| q == 0) {
            return Err(Error::InvalidQuantizationTable(pos));
        }
        Ok(QuantizationTable { values })
    }

    /// Builds a table from factors in natural (row-major) order.
    pub fn from_natural(natural: &[u16; BLOCK_SIZE]) -> Result<QuantizationTable> {
        Self::new(std::array::from_fn(|zz| natural[ZIGZAG_TO_NATURAL[zz]]))
    }

    /// Scales a base table given in natural order to `quality` (1..=100),
    /// following the IJG convention. Entries are clamped to 1..=255.
    /// ```
    /// # use jpeg::frame::quantizer::{QuantizationTable, LUMINANCE_BASE};
    /// let q50 = QuantizationTable::from_quality(&LUMINANCE_BASE, 50)?;
    /// assert_eq!(q50.values()[0], 16);
    /// let q100 = QuantizationTable::from_quality(&LUMINANCE_BASE, 100)?;
    /// assert!(q100.values().iter().all(|&q| q == 1));
    /// # Ok::<(), jpeg::error::Error>(())
    /// ```
    pub fn from_quality(base: &[u16; BLOCK_SIZE], quality: u8) -> Result<QuantizationTable> {
        let scale = quality_scale(quality)?;
        let natural = base.map(|b| ((b as u32 * scale + 50) / 100).clamp(1, 255) as u16);
        Self::from_natural(&natural)
    }

    pub fn values(&self) -> &[u16; BLOCK_SIZE] {
        &self.values
    }

    pub fn quantize(&self, coeff: f32, zigzag_pos: usize) -> i16 {
        (coeff / self.values[zigzag_pos] as f32)
            .round()
            .clamp(MIN_LEVEL, MAX_LEVEL) as i16
    }

    pub fn dequantize(&self, level: i16, zigzag_pos: usize) -> f32 {
        level as f32 * self.values[zigzag_pos] as f32
    }

    /// Quantizes DCT coefficients in natural order into levels in zig-zag
    /// order.
    pub fn quantize_block(&self, coeffs: &[f32; BLOCK_SIZE], levels: &mut [i16; BLOCK_SIZE]) {
        for (zz, level) in levels.iter_mut().enumerate() {
            *level = self.quantize(coeffs[ZIGZAG_TO_NATURAL[zz]], zz);
        }
    }

    /// Inverse of [`Self::quantize_block`].
    pub fn dequantize_block(&self, levels: &[i16; BLOCK_SIZE], coeffs: &mut [f32; BLOCK_SIZE]) {
        for (natural, coeff) in coeffs.iter_mut().enumerate() {
            let zz = NATURAL_TO_ZIGZAG[natural];
            *coeff = self.dequantize(levels[zz], zz);
        }
    }
}

/// The IJG quality scaling factor, in percent.
pub fn quality_scale(quality: u8) -> Result<u32> {
    match quality {
        1..50 => Ok(5000 / quality as u32),
        50..=100 => Ok(200 - 2 * quality as u32),
        _ => Err(Error::InvalidQuality(quality)),
    }
}

/// Base tables in natural order for the luminance and chrominance
/// components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTableSet {
    pub luminance: [u16; BLOCK_SIZE],
    pub chrominance: [u16; BLOCK_SIZE],
}

impl Default for QuantTableSet {
    fn default() -> Self {
        QuantTableSet {
            luminance: LUMINANCE_BASE,
            chrominance: CHROMINANCE_BASE,
        }
    }
}

/// ITU-T T.81 Table K.1.
#[rustfmt::skip]
pub const LUMINANCE_BASE: [u16; BLOCK_SIZE] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// ITU-T T.81 Table K.2.
#[rustfmt::skip]
pub const CHROMINANCE_BASE: [u16; BLOCK_SIZE] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];
