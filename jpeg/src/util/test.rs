// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_traits::Num;

use crate::BLOCK_SIZE;

pub fn abs_delta<T: Num + PartialOrd>(a: T, b: T) -> T {
    if a > b { a - b } else { b - a }
}

/// Whether `a` and `b` are within `max_error`; NaN never is.
pub fn within<T: Num + PartialOrd + Copy>(a: T, b: T, max_error: T) -> bool {
    matches!(
        abs_delta(a, b).partial_cmp(&max_error),
        Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
    )
}

macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left, right, max_error) = ($left, $right, $max_error);
        if !$crate::util::test::within(left, right, max_error) {
            panic!("`{left:?}` and `{right:?}` differ by more than `{max_error:?}`");
        }
    };
}
pub(crate) use assert_almost_eq;

/// Element-wise [`assert_almost_eq!`] over anything indexable with a
/// length, reporting the first offending position.
macro_rules! assert_all_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left, right, max_error) = (&$left, &$right, $max_error);
        assert_eq!(left.len(), right.len(), "length mismatch");
        for i in 0..left.len() {
            if !$crate::util::test::within(left[i], right[i], max_error) {
                panic!(
                    "at {i}: `{:?}` and `{:?}` differ by more than `{max_error:?}`\n left: {left:?}\nright: {right:?}",
                    left[i], right[i]
                );
            }
        }
    };
}
pub(crate) use assert_all_almost_eq;

/// Pseudo-random 8x8 block of samples in [0, 255].
pub fn random_block(rng: &mut impl rand::Rng) -> [f32; BLOCK_SIZE] {
    std::array::from_fn(|_| rng.random_range(0..=255u8) as f32)
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn scalars() {
        assert_almost_eq!(127.9995f32, 128.0, 1e-3);
        assert_almost_eq!(-1024i32, -1022, 2);
        assert!(!within(f32::NAN, f32::NAN, 1.0));
    }

    #[test]
    #[should_panic]
    fn scalar_mismatch() {
        assert_almost_eq!(16u16, 19, 2);
    }

    #[test]
    fn blocks() {
        let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(7);
        let block = random_block(&mut rng);
        assert!(block.iter().all(|&v| (0.0..=255.0).contains(&v)));
        let mut nudged = block;
        nudged[63] += 0.5;
        assert_all_almost_eq!(block, nudged, 0.5);
    }

    #[test]
    #[should_panic]
    fn block_length_mismatch() {
        assert_all_almost_eq!([1.0f32, 2.0], [1.0f32], 0.1);
    }
}
