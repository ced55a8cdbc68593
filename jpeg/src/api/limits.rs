// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Resource limits for JPEG decoding.

use crate::error::{Error, Result};

/// Configurable resource limits for the JPEG decoder.
///
/// These bound the work a malicious stream can cause: the pixel count limits
/// the size of the sample planes allocated at the frame header, and the scan
/// limit bounds how often the frame can be re-decoded.
///
/// By default all limits are `None` (unlimited). Use
/// [`JpegDecoderLimits::default_safe()`] for recommended limits, or
/// [`JpegDecoderLimits::restrictive()`] for untrusted content.
///
/// # Example
///
/// ```
/// use jpeg::api::JpegDecoderLimits;
///
/// // Trusted content
/// let limits = JpegDecoderLimits::default();
///
/// // General use
/// let limits = JpegDecoderLimits::default_safe();
///
/// // Untrusted web content
/// let limits = JpegDecoderLimits::restrictive();
/// assert!(limits.max_pixels.is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct JpegDecoderLimits {
    /// Maximum total pixels allowed (width * height).
    /// Default: `None` (unlimited).
    /// Recommended safe: `1 << 30`.
    pub max_pixels: Option<usize>,

    /// Maximum number of scans in the stream.
    /// Default: `None` (unlimited).
    /// Recommended safe: `64`.
    pub max_scans: Option<usize>,
}

impl JpegDecoderLimits {
    /// Returns limits suitable for general use.
    pub fn default_safe() -> Self {
        Self {
            max_pixels: Some(1 << 30),
            max_scans: Some(64),
        }
    }

    /// Returns tight limits for untrusted input: about 16 megapixels and
    /// one scan per component.
    pub fn restrictive() -> Self {
        Self {
            max_pixels: Some(1 << 24),
            max_scans: Some(3),
        }
    }

    /// Returns a copy with every limit removed.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub(crate) fn check_pixels(&self, width: usize, height: usize) -> Result<()> {
        if let Some(max) = self.max_pixels {
            let pixels = width
                .checked_mul(height)
                .ok_or(Error::ImageTooLarge(width, height))?;
            if pixels > max {
                return Err(Error::ImageTooLarge(width, height));
            }
        }
        Ok(())
    }

    pub(crate) fn check_scans(&self, scans: usize) -> Result<()> {
        match self.max_scans {
            Some(max) if scans > max => Err(Error::TooManyScans(max)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unlimited_by_default() {
        let limits = JpegDecoderLimits::default();
        assert!(limits.check_pixels(65535, 65535).is_ok());
        assert!(limits.check_scans(1000).is_ok());
    }

    #[test]
    fn restrictive() {
        let limits = JpegDecoderLimits::restrictive();
        assert!(limits.check_pixels(4096, 4096).is_ok());
        assert!(matches!(
            limits.check_pixels(4097, 4096),
            Err(Error::ImageTooLarge(4097, 4096))
        ));
        assert!(limits.check_scans(3).is_ok());
        assert!(matches!(limits.check_scans(4), Err(Error::TooManyScans(3))));
    }
}
