// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jpeg::{JpegDecoder, JpegDecoderLimits, JpegDecoderOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut options = JpegDecoderOptions::default();
    options.limits = JpegDecoderLimits::restrictive();
    if let Ok(image) = JpegDecoder::new(options).decode(data) {
        assert_eq!(
            image.pixels.len(),
            image.width * image.height * image.components
        );
    }
});
