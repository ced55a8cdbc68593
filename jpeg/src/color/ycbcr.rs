// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Full-range BT.601 YCbCr as defined by JFIF (ITU-T T.871), on samples in
//! [0, 255] with chroma centered at 128.

use crate::error::{Error, Result};
use crate::image::Plane;

const KR: f32 = 0.299;
const KB: f32 = 0.114;
const KG: f32 = 1.0 - KR - KB;
const CB_SCALE: f32 = 2.0 * (1.0 - KB);
const CR_SCALE: f32 = 2.0 * (1.0 - KR);
const CHROMA_OFFSET: f32 = 128.0;

pub fn rgb_to_ycbcr(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = r.mul_add(KR, g.mul_add(KG, b * KB));
    let cb = (b - y) / CB_SCALE + CHROMA_OFFSET;
    let cr = (r - y) / CR_SCALE + CHROMA_OFFSET;
    (y, cb, cr)
}

pub fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> (f32, f32, f32) {
    let cb = cb - CHROMA_OFFSET;
    let cr = cr - CHROMA_OFFSET;
    let r = cr.mul_add(CR_SCALE, y);
    let g = cr.mul_add(-KR * CR_SCALE / KG, cb.mul_add(-KB * CB_SCALE / KG, y));
    let b = cb.mul_add(CB_SCALE, y);
    (r, g, b)
}

/// Rounds and clamps to an 8-bit sample.
pub fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

pub fn rgb_to_ycbcr_u8(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (y, cb, cr) = rgb_to_ycbcr(r as f32, g as f32, b as f32);
    (to_u8(y), to_u8(cb), to_u8(cr))
}

pub fn ycbcr_to_rgb_u8(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let (r, g, b) = ycbcr_to_rgb(y as f32, cb as f32, cr as f32);
    (to_u8(r), to_u8(g), to_u8(b))
}

/// Splits interleaved 8-bit pixels into full-resolution planes: Y for
/// grayscale, Y, Cb and Cr for RGB.
pub fn split_planes(
    pixels: &[u8],
    width: usize,
    height: usize,
    components: usize,
) -> Result<Vec<Plane<f32>>> {
    if components != 1 && components != 3 {
        return Err(Error::InvalidComponentCount(components));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(components))
        .ok_or(Error::ArithmeticOverflow)?;
    if pixels.len() != expected {
        return Err(Error::InvalidBufferSize {
            expected,
            actual: pixels.len(),
        });
    }
    let mut planes = Vec::with_capacity(components);
    for _ in 0..components {
        planes.push(Plane::new((width, height))?);
    }
    for (y, row) in pixels.chunks_exact(width * components).enumerate() {
        match planes.as_mut_slice() {
            [luma] => {
                for (out, &v) in luma.row_mut(y).iter_mut().zip(row) {
                    *out = v as f32;
                }
            }
            [py, pcb, pcr] => {
                let (py, pcb, pcr) = (py.row_mut(y), pcb.row_mut(y), pcr.row_mut(y));
                for (x, rgb) in row.chunks_exact(3).enumerate() {
                    (py[x], pcb[x], pcr[x]) =
                        rgb_to_ycbcr(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32);
                }
            }
            _ => {}
        }
    }
    Ok(planes)
}

/// Interleaves full-resolution planes back into 8-bit pixels, converting
/// YCbCr to RGB when there are three.
pub fn merge_planes(planes: &[Plane<f32>]) -> Result<Vec<u8>> {
    let (width, height) = match planes {
        [p] | [p, _, _] => p.size(),
        _ => return Err(Error::InvalidComponentCount(planes.len())),
    };
    let mut pixels = vec![];
    pixels.try_reserve_exact(width * height * planes.len())?;
    match planes {
        [luma] => {
            for y in 0..height {
                pixels.extend(luma.row(y).iter().map(|&v| to_u8(v)));
            }
        }
        [py, pcb, pcr] => {
            for y in 0..height {
                for ((&l, &cb), &cr) in py.row(y).iter().zip(pcb.row(y)).zip(pcr.row(y)) {
                    let (r, g, b) = ycbcr_to_rgb(l, cb, cr);
                    pixels.extend_from_slice(&[to_u8(r), to_u8(g), to_u8(b)]);
                }
            }
        }
        _ => {}
    }
    Ok(pixels)
}
