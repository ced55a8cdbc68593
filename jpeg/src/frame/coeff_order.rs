// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

/// Natural (row-major) index of each zig-zag position.
#[rustfmt::skip]
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_SIZE] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Zig-zag position of each natural index.
pub const NATURAL_TO_ZIGZAG: [usize; BLOCK_SIZE] = invert(&ZIGZAG_TO_NATURAL);

const fn invert(order: &[usize; BLOCK_SIZE]) -> [usize; BLOCK_SIZE] {
    let mut out = [0; BLOCK_SIZE];
    let mut i = 0;
    while i < BLOCK_SIZE {
        out[order[i]] = i;
        i += 1;
    }
    out
}

#[cfg(test)]
mod test {
    use std::mem;

    use super::*;
    use crate::BLOCK_DIM;

    // Walks the anti-diagonals, alternating direction.
    fn traversal() -> Vec<usize> {
        let mut out = Vec::with_capacity(BLOCK_SIZE);
        for i in 0..BLOCK_DIM {
            for j in 0..=i {
                let (mut x, mut y) = (j, i - j);
                if i % 2 != 0 {
                    mem::swap(&mut x, &mut y);
                }
                out.push(y * BLOCK_DIM + x);
            }
        }
        for i in (0..BLOCK_DIM - 1).rev() {
            for j in 0..=i {
                let (mut x, mut y) = (BLOCK_DIM - 1 - (i - j), BLOCK_DIM - 1 - j);
                if i % 2 != 0 {
                    mem::swap(&mut x, &mut y);
                }
                out.push(y * BLOCK_DIM + x);
            }
        }
        out
    }

    #[test]
    fn matches_traversal() {
        assert_eq!(traversal(), ZIGZAG_TO_NATURAL);
    }

    #[test]
    fn inverse() {
        for (zz, &natural) in ZIGZAG_TO_NATURAL.iter().enumerate() {
            assert_eq!(NATURAL_TO_ZIGZAG[natural], zz);
        }
    }
}
