// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::PI;

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

fn basis(freq: usize, pos: usize) -> f64 {
    ((2 * pos + 1) as f64 * freq as f64 * PI / (2 * BLOCK_DIM) as f64).cos()
}

/// F(u, v) = 1/4 C(u) C(v) sum f(x, y) cos(..) cos(..), evaluated term by
/// term. Both blocks are row-major, `out[v * 8 + u]`.
pub fn dct2d(input: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for v in 0..BLOCK_DIM {
        for u in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for y in 0..BLOCK_DIM {
                for x in 0..BLOCK_DIM {
                    sum += input[y * BLOCK_DIM + x] * basis(u, x) * basis(v, y);
                }
            }
            out[v * BLOCK_DIM + u] = 0.25 * alpha(u) * alpha(v) * sum;
        }
    }
    out
}

pub fn idct2d(input: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for y in 0..BLOCK_DIM {
        for x in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for v in 0..BLOCK_DIM {
                for u in 0..BLOCK_DIM {
                    sum += alpha(u) * alpha(v) * input[v * BLOCK_DIM + u] * basis(u, x) * basis(v, y);
                }
            }
            out[y * BLOCK_DIM + x] = 0.25 * sum;
        }
    }
    out
}
