// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Synthetic images and sample comparisons shared by the integration tests
//! and benches.

/// Asserts that two scalars differ by at most `max_error`. Works for any
/// type with `PartialOrd` and `Sub`, integers and floats alike.
#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left, right, max_error) = ($left, $right, $max_error);
        let diff = if left > right { left - right } else { right - left };
        if !(diff <= max_error) {
            panic!("`{left:?}` is not within `{max_error:?}` of `{right:?}`");
        }
    };
}

/// Asserts that two sample buffers have the same length and differ by at
/// most `max_error` at every position, reporting the first offender.
#[macro_export]
macro_rules! assert_samples_close {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left_val, right_val): (&[u8], &[u8]) = (&$left, &$right);
        assert_eq!(left_val.len(), right_val.len(), "sample count mismatch");
        if let Some((index, diff)) = $crate::first_difference_above(left_val, right_val, $max_error)
        {
            panic!(
                "samples differ by {} at index {}: left `{}`, right `{}`, max_error `{}`",
                diff, index, left_val[index], right_val[index], $max_error
            );
        }
    };
}

/// Largest absolute difference between corresponding samples.
pub fn max_abs_diff(a: &[u8], b: &[u8]) -> u8 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.abs_diff(y))
        .max()
        .unwrap_or(0)
}

/// Index and difference of the first pair of samples further apart than
/// `max_error`.
pub fn first_difference_above(a: &[u8], b: &[u8], max_error: u8) -> Option<(usize, u8)> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.abs_diff(y))
        .enumerate()
        .find(|&(_, d)| d > max_error)
}

/// Smooth grayscale ramp running from the top-left to the bottom-right
/// corner.
pub fn gray_gradient(width: usize, height: usize) -> Vec<u8> {
    let span = (width + height).saturating_sub(2).max(1);
    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x + y) * 255 / span) as u8))
        .collect()
}

/// Interleaved RGB image: red grows to the right, green downwards and blue
/// along the diagonal, all slowly enough to survive chroma subsampling.
pub fn rgb_gradient(width: usize, height: usize) -> Vec<u8> {
    let wspan = width.saturating_sub(1).max(1);
    let hspan = height.saturating_sub(1).max(1);
    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            out.push((x * 255 / wspan) as u8);
            out.push((y * 255 / hspan) as u8);
            out.push(((x + y) * 127 / (wspan + hspan)) as u8 + 64);
        }
    }
    out
}

/// Alternating `low`/`high` squares of `cell` pixels, `components` samples
/// per pixel.
pub fn checkerboard(
    width: usize,
    height: usize,
    components: usize,
    cell: usize,
    low: u8,
    high: u8,
) -> Vec<u8> {
    let cell = cell.max(1);
    let mut out = Vec::with_capacity(width * height * components);
    for y in 0..height {
        for x in 0..width {
            let v = if (x / cell + y / cell) % 2 == 0 {
                low
            } else {
                high
            };
            out.extend(std::iter::repeat_n(v, components));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_almost_eq!(127.6f32, 128.0, 0.5);
        assert_almost_eq!(200u8, 198, 2);
        assert_almost_eq!(-3i32, 1, 4);
    }

    #[test]
    fn mismatches_panic() {
        let result = std::panic::catch_unwind(|| {
            assert_almost_eq!(0u8, 3, 2);
        });
        assert!(result.is_err());
        let result = std::panic::catch_unwind(|| {
            assert_almost_eq!(f32::NAN, 0.0, 1.0);
        });
        assert!(result.is_err());
        let result = std::panic::catch_unwind(|| {
            assert_samples_close!([1u8, 2, 3], [1u8, 2, 9], 2);
        });
        assert!(result.is_err());
    }

    #[test]
    fn differences() {
        assert_eq!(max_abs_diff(&[1, 200, 3], &[4, 190, 3]), 10);
        assert_eq!(first_difference_above(&[1, 200, 3], &[4, 190, 3], 3), Some((1, 10)));
        assert_eq!(first_difference_above(&[1, 2], &[1, 2], 0), None);
        assert_samples_close!([10u8, 20], [12u8, 19], 2);
    }

    #[test]
    fn generators() {
        let gray = gray_gradient(16, 8);
        assert_eq!(gray.len(), 128);
        assert_eq!((gray[0], gray[127]), (0, 255));
        let rgb = rgb_gradient(4, 4);
        assert_eq!(rgb.len(), 48);
        assert_eq!(&rgb[..3], &[0, 0, 64]);
        assert_eq!(&rgb[45..], &[255, 255, 191]);
        let board = checkerboard(4, 2, 3, 2, 0, 255);
        assert_eq!(&board[..6], &[0; 6]);
        assert_eq!(&board[6..12], &[255; 6]);
        assert_eq!(gray_gradient(1, 1), vec![0]);
    }
}
