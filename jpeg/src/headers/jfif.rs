// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::writer::push_u16;
use crate::util::tracing_wrappers::*;

const IDENTIFIER: &[u8; 5] = b"JFIF\0";

#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Default)]
pub enum DensityUnits {
    /// Only the aspect ratio is meaningful.
    #[default]
    None = 0,
    PerInch = 1,
    PerCentimeter = 2,
}

/// The JFIF APP0 segment. Thumbnails are neither read nor written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JfifHeader {
    pub version: (u8, u8),
    pub units: DensityUnits,
    pub x_density: u16,
    pub y_density: u16,
}

impl Default for JfifHeader {
    fn default() -> Self {
        JfifHeader {
            version: (1, 1),
            units: DensityUnits::None,
            x_density: 1,
            y_density: 1,
        }
    }
}

impl JfifHeader {
    /// Parses an APP0 payload. Returns `None` for APP0 segments of other
    /// applications or with malformed contents.
    pub fn read(payload: &[u8]) -> Option<JfifHeader> {
        if payload.len() < 14 || &payload[..5] != IDENTIFIER {
            return None;
        }
        let units = match DensityUnits::from_u8(payload[7]) {
            Some(units) => units,
            None => {
                warn!(units = payload[7], "unknown JFIF density units");
                DensityUnits::None
            }
        };
        Some(JfifHeader {
            version: (payload[5], payload[6]),
            units,
            x_density: BigEndian::read_u16(&payload[8..]),
            y_density: BigEndian::read_u16(&payload[10..]),
        })
    }

    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(14);
        out.extend_from_slice(IDENTIFIER);
        out.extend_from_slice(&[self.version.0, self.version.1, self.units as u8]);
        push_u16(&mut out, self.x_density);
        push_u16(&mut out, self.y_density);
        // No thumbnail.
        out.extend_from_slice(&[0, 0]);
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_what_it_writes() {
        let header = JfifHeader {
            version: (1, 2),
            units: DensityUnits::PerInch,
            x_density: 300,
            y_density: 72,
        };
        let payload = header.payload();
        assert_eq!(payload.len(), 14);
        assert_eq!(JfifHeader::read(&payload), Some(header));
    }

    #[test]
    fn ignores_other_app0() {
        assert_eq!(JfifHeader::read(b"JFXX\0\x10\0\0\0\0\0\0\0\0"), None);
        assert_eq!(JfifHeader::read(b"JFIF\0"), None);
    }
}
