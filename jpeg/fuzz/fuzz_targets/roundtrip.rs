// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jpeg::{ChromaSubsampling, JpegEncoder, JpegEncoderOptions};
use libfuzzer_sys::fuzz_target;

// The first bytes select the options, the rest are pixels.
fuzz_target!(|data: &[u8]| {
    let [width, quality, flags, pixels @ ..] = data else {
        return;
    };
    let width = *width as usize % 64 + 1;
    let components = if flags & 1 == 0 { 1 } else { 3 };
    let height = (pixels.len() / (width * components)).min(256);
    if height == 0 {
        return;
    }
    let mut options = JpegEncoderOptions::with_quality(quality % 100 + 1);
    options.subsampling = match (flags >> 1) % 3 {
        0 => ChromaSubsampling::Yuv444,
        1 => ChromaSubsampling::Yuv422,
        _ => ChromaSubsampling::Yuv420,
    };
    options.restart_interval = (flags >> 3) as u16;
    options.optimize_huffman = flags & 0x80 != 0;
    options.separate_scans = flags & 0x40 != 0;
    let Ok(encoder) = JpegEncoder::new(options) else {
        return;
    };
    let pixels = &pixels[..width * height * components];
    let encoded = encoder
        .encode(pixels, width, height, components)
        .expect("valid input must encode");
    let image = jpeg::decode(&encoded).expect("encoder output must decode");
    assert_eq!((image.width, image.height), (width, height));
});
