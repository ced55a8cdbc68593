// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::JpegDecoderLimits;
use crate::frame::quantizer::QuantTableSet;

/// How the chroma planes are subsampled relative to luma when encoding
/// color images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    /// Full resolution chroma.
    #[default]
    Yuv444,
    /// Half horizontal chroma resolution.
    Yuv422,
    /// Half horizontal and vertical chroma resolution.
    Yuv420,
}

impl ChromaSubsampling {
    /// Sampling factors (h, v) of the luma component; chroma components
    /// always use 1x1.
    pub fn luma_sampling(&self) -> (u8, u8) {
        match self {
            Self::Yuv444 => (1, 1),
            Self::Yuv422 => (2, 1),
            Self::Yuv420 => (2, 2),
        }
    }
}

/// Filter used to bring subsampled chroma planes back to full resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaUpsampling {
    /// Sample replication.
    Nearest,
    /// 3:1 weighting of the two closest samples along every axis that was
    /// halved. Other ratios fall back to replication.
    #[default]
    Triangle,
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct JpegEncoderOptions {
    /// IJG quality in 1..=100.
    pub quality: u8,
    pub subsampling: ChromaSubsampling,
    /// MCUs between restart markers, 0 disables them.
    pub restart_interval: u16,
    /// Derive Huffman tables from the image statistics instead of using the
    /// Annex K tables.
    pub optimize_huffman: bool,
    /// Write one scan per component instead of one interleaved scan.
    pub separate_scans: bool,
    pub write_jfif: bool,
    pub comment: Option<String>,
    /// Base tables scaled by `quality`.
    pub quant_tables: QuantTableSet,
}

impl Default for JpegEncoderOptions {
    fn default() -> Self {
        Self {
            quality: 75,
            subsampling: ChromaSubsampling::default(),
            restart_interval: 0,
            optimize_huffman: false,
            separate_scans: false,
            write_jfif: true,
            comment: None,
            quant_tables: QuantTableSet::default(),
        }
    }
}

impl JpegEncoderOptions {
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct JpegDecoderOptions {
    pub limits: JpegDecoderLimits,
    pub upsampling: ChromaUpsampling,
}
