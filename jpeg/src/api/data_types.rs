// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::headers::{ComponentSpec, JfifHeader};

/// A decoded image: interleaved 8-bit samples, row-major, `components`
/// samples per pixel (1 for grayscale, 3 for RGB).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub components: usize,
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * self.components;
        &self.pixels[y * stride..(y + 1) * stride]
    }

    /// Samples of the pixel at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.components;
        &self.pixels[start..start + self.components]
    }
}

/// Header-level description of a stream, available without decoding the
/// entropy-coded data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: usize,
    pub height: usize,
    /// Frame components with their ids, sampling factors and quantization
    /// table slots.
    pub components: Vec<ComponentSpec>,
    pub jfif: Option<JfifHeader>,
    /// MCUs between restart markers as of the first scan, 0 if disabled.
    pub restart_interval: u16,
    pub comments: Vec<String>,
}

impl JpegInfo {
    pub fn is_grayscale(&self) -> bool {
        self.components.len() == 1
    }
}
