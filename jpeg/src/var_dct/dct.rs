// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f32::consts::{FRAC_1_SQRT_2, PI};
use std::sync::LazyLock;

use crate::{BLOCK_DIM, BLOCK_SIZE};

// DCT_MATRIX[u][x] = c(u) / 2 * cos((2x + 1) u pi / 16), orthonormal.
static DCT_MATRIX: LazyLock<[[f32; BLOCK_DIM]; BLOCK_DIM]> = LazyLock::new(|| {
    array_init::array_init(|u| {
        let scale = 0.5 * if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
        array_init::array_init(|x| {
            scale * ((2 * x + 1) as f32 * u as f32 * PI / (2 * BLOCK_DIM) as f32).cos()
        })
    })
});

/// In-place 2D forward DCT of a row-major block of level-shifted samples.
/// The result holds the coefficient for horizontal frequency `u` and
/// vertical frequency `v` at `v * 8 + u`.
pub fn forward_dct_8x8(block: &mut [f32; BLOCK_SIZE]) {
    let m = &*DCT_MATRIX;
    let mut tmp = [0.0f32; BLOCK_SIZE];
    for y in 0..BLOCK_DIM {
        let row = &block[y * BLOCK_DIM..(y + 1) * BLOCK_DIM];
        for u in 0..BLOCK_DIM {
            tmp[y * BLOCK_DIM + u] = row
                .iter()
                .zip(m[u].iter())
                .fold(0.0, |acc, (&s, &c)| s.mul_add(c, acc));
        }
    }
    for u in 0..BLOCK_DIM {
        for v in 0..BLOCK_DIM {
            let mut acc = 0.0f32;
            for y in 0..BLOCK_DIM {
                acc = tmp[y * BLOCK_DIM + u].mul_add(m[v][y], acc);
            }
            block[v * BLOCK_DIM + u] = acc;
        }
    }
}

/// In-place 2D inverse DCT; exact inverse of [`forward_dct_8x8`] up to
/// rounding.
pub fn inverse_dct_8x8(block: &mut [f32; BLOCK_SIZE]) {
    let m = &*DCT_MATRIX;
    let mut tmp = [0.0f32; BLOCK_SIZE];
    for v in 0..BLOCK_DIM {
        for x in 0..BLOCK_DIM {
            let mut acc = 0.0f32;
            for u in 0..BLOCK_DIM {
                acc = block[v * BLOCK_DIM + u].mul_add(m[u][x], acc);
            }
            tmp[v * BLOCK_DIM + x] = acc;
        }
    }
    for x in 0..BLOCK_DIM {
        for y in 0..BLOCK_DIM {
            let mut acc = 0.0f32;
            for v in 0..BLOCK_DIM {
                acc = tmp[v * BLOCK_DIM + x].mul_add(m[v][y], acc);
            }
            block[y * BLOCK_DIM + x] = acc;
        }
    }
}
