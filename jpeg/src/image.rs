// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::util::tracing_wrappers::*;

/// A single-channel 2D buffer of samples.
#[derive(Clone, PartialEq)]
pub struct Plane<T> {
    size: (usize, usize),
    data: Vec<T>,
}

impl<T> Debug for Plane<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Plane {}x{}", self.size.0, self.size.1)
    }
}

impl<T: Copy + Default> Plane<T> {
    pub fn new(size: (usize, usize)) -> Result<Plane<T>> {
        let (xsize, ysize) = size;
        if xsize == 0 || ysize == 0 {
            return Err(Error::InvalidDimensions(xsize, ysize));
        }
        let total_size = xsize
            .checked_mul(ysize)
            .ok_or(Error::ImageTooLarge(xsize, ysize))?;
        trace!(xsize, ysize, "allocating plane");
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        data.resize(total_size, T::default());
        Ok(Plane { size, data })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, y: usize) -> &[T] {
        let xsize = self.size.0;
        &self.data[y * xsize..(y + 1) * xsize]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let xsize = self.size.0;
        &mut self.data[y * xsize..(y + 1) * xsize]
    }

    /// The sample at (x, y), with coordinates clamped to the plane so that
    /// the last row and column repeat outwards.
    pub fn get_clamped(&self, x: usize, y: usize) -> T {
        let x = x.min(self.size.0 - 1);
        let y = y.min(self.size.1 - 1);
        self.data[y * self.size.0 + x]
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn huge_plane() {
        assert!(Plane::<u8>::new((1 << 40, 1 << 40)).is_err());
        assert!(Plane::<f32>::new((1 << 31, 1 << 31)).is_err());
    }

    #[test]
    fn empty_plane() {
        assert!(matches!(
            Plane::<u8>::new((0, 3)),
            Err(Error::InvalidDimensions(0, 3))
        ));
    }

    #[test]
    fn rows_and_clamping() -> Result<()> {
        let mut plane = Plane::<u8>::new((3, 2))?;
        plane.row_mut(1).copy_from_slice(&[1, 2, 3]);
        assert_eq!(plane.row(0), &[0, 0, 0]);
        assert_eq!(plane.get_clamped(1, 1), 2);
        assert_eq!(plane.get_clamped(10, 1), 3);
        assert_eq!(plane.get_clamped(10, 10), 3);
        assert_eq!(plane.data().len(), 6);
        Ok(())
    }
}
