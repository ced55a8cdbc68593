// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::api::ChromaUpsampling;
use crate::error::Result;
use crate::image::Plane;

/// Shrinks `plane` to `size` by averaging `h_ratio` x `v_ratio` boxes.
/// Boxes reaching past the plane edge repeat the last row and column.
pub fn downsample(
    plane: &Plane<f32>,
    h_ratio: usize,
    v_ratio: usize,
    size: (usize, usize),
) -> Result<Plane<f32>> {
    let mut out = Plane::new(size)?;
    let norm = 1.0 / (h_ratio * v_ratio) as f32;
    for y in 0..size.1 {
        let row = out.row_mut(y);
        for (x, v) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for dy in 0..v_ratio {
                for dx in 0..h_ratio {
                    sum += plane.get_clamped(x * h_ratio + dx, y * v_ratio + dy);
                }
            }
            *v = sum * norm;
        }
    }
    Ok(out)
}

// Index of the nearest input sample and of the neighbor on the side of the
// output sample, for a 2x triangle filter.
fn triangle_taps(out_pos: usize, len: usize) -> (usize, usize) {
    let center = (out_pos / 2).min(len - 1);
    let neighbor = if out_pos % 2 == 0 {
        center.saturating_sub(1)
    } else {
        (center + 1).min(len - 1)
    };
    (center, neighbor)
}

fn upsample_row(input: &[f32], output: &mut [f32], ratio: usize, mode: ChromaUpsampling) {
    for (x, out) in output.iter_mut().enumerate() {
        if ratio == 2 && mode == ChromaUpsampling::Triangle {
            let (c, n) = triangle_taps(x, input.len());
            *out = input[n].mul_add(0.25, input[c] * 0.75);
        } else {
            *out = input[(x / ratio).min(input.len() - 1)];
        }
    }
}

/// Expands `plane` by `h_ratio` x `v_ratio` to exactly `size`.
///
/// With [`ChromaUpsampling::Triangle`], axes with a ratio of 2 are
/// interpolated with 3/4 and 1/4 weights on the two nearest samples, which
/// matches centered chroma siting. All other cases replicate samples.
pub fn upsample(
    plane: &Plane<f32>,
    h_ratio: usize,
    v_ratio: usize,
    size: (usize, usize),
    mode: ChromaUpsampling,
) -> Result<Plane<f32>> {
    let in_height = plane.size().1;
    let mut wide = Plane::new((size.0, in_height))?;
    for y in 0..in_height {
        upsample_row(plane.row(y), wide.row_mut(y), h_ratio, mode);
    }
    let mut out = Plane::new(size)?;
    for y in 0..size.1 {
        let row = out.row_mut(y);
        if v_ratio == 2 && mode == ChromaUpsampling::Triangle {
            let (c, n) = triangle_taps(y, in_height);
            for ((v, &center), &neighbor) in row.iter_mut().zip(wide.row(c)).zip(wide.row(n)) {
                *v = neighbor.mul_add(0.25, center * 0.75);
            }
        } else {
            row.copy_from_slice(wide.row((y / v_ratio).min(in_height - 1)));
        }
    }
    Ok(out)
}
