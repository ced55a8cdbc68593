// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Baseline (sequential, Huffman-coded, 8-bit) JPEG encoder and decoder.
//!
//! ```
//! let pixels = vec![128u8; 16 * 16];
//! let encoded = jpeg::encode(&pixels, 16, 16, 1, 75)?;
//! let image = jpeg::decode(&encoded)?;
//! assert_eq!((image.width, image.height, image.components), (16, 16, 1));
//! # Ok::<(), jpeg::error::Error>(())
//! ```

#![deny(unsafe_code)]
pub mod api;
pub mod bit_reader;
pub mod bit_writer;
pub mod color;
pub mod entropy_coding;
pub mod error;
pub mod frame;
pub mod headers;
pub mod image;
pub mod util;
pub mod var_dct;

pub use api::{
    ChromaSubsampling, ChromaUpsampling, Image, JpegDecoder, JpegDecoderLimits,
    JpegDecoderOptions, JpegEncoder, JpegEncoderOptions, JpegInfo, decode, encode, read_info,
};

const BLOCK_DIM: usize = 8;
const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;
/// Grayscale or YCbCr.
const MAX_COMPONENTS: usize = 3;
/// Baseline allows at most four of each table kind.
const MAX_TABLES: usize = 4;
/// Sampling factors are 4-bit fields limited to 1..=4.
const MAX_SAMPLING: u8 = 4;
