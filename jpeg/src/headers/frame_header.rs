// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ReadBytesExt};

use super::markers::{SOF0, SOF1, sof_name};
use super::writer::push_u16;
use crate::error::{Error, Result};
use crate::{MAX_SAMPLING, MAX_TABLES};

/// One component of a frame, as declared in SOFn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    pub id: u8,
    pub h: u8,
    pub v: u8,
    pub quant_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub marker: u8,
    pub precision: u8,
    pub width: u16,
    pub height: u16,
    pub components: Vec<ComponentSpec>,
}

impl FrameHeader {
    /// A baseline frame header for encoding.
    pub fn baseline(width: u16, height: u16, components: Vec<ComponentSpec>) -> FrameHeader {
        FrameHeader {
            marker: SOF0,
            precision: 8,
            width,
            height,
            components,
        }
    }

    /// Parses and validates the payload of a SOFn segment. Only the
    /// sequential Huffman processes with 8-bit samples are accepted.
    pub fn read(marker: u8, payload: &[u8]) -> Result<FrameHeader> {
        if marker != SOF0 && marker != SOF1 {
            return Err(Error::UnsupportedFeature(format!(
                "{} frame (SOF{})",
                sof_name(marker),
                marker - SOF0
            )));
        }
        let truncated = || Error::InvalidSegmentLength(marker, payload.len());
        let mut r = payload;
        let precision = r.read_u8().map_err(|_| truncated())?;
        let height = r.read_u16::<BigEndian>().map_err(|_| truncated())?;
        let width = r.read_u16::<BigEndian>().map_err(|_| truncated())?;
        let num_components = r.read_u8().map_err(|_| truncated())? as usize;
        if r.len() != 3 * num_components {
            return Err(truncated());
        }
        if precision != 8 {
            return Err(Error::UnsupportedFeature(format!(
                "{precision}-bit sample precision"
            )));
        }
        if height == 0 {
            return Err(Error::UnsupportedFeature(
                "height defined by DNL".to_string(),
            ));
        }
        if width == 0 {
            return Err(Error::InvalidDimensions(width as usize, height as usize));
        }
        if num_components != 1 && num_components != 3 {
            return Err(Error::UnsupportedFeature(format!(
                "{num_components} color components"
            )));
        }
        let mut components = Vec::with_capacity(num_components);
        for c in r.chunks_exact(3) {
            let (h, v) = (c[1] >> 4, c[1] & 0xF);
            if !(1..=MAX_SAMPLING).contains(&h) || !(1..=MAX_SAMPLING).contains(&v) {
                return Err(Error::InvalidSampling(h, v));
            }
            if c[2] as usize >= MAX_TABLES {
                return Err(Error::InvalidTableId(c[2]));
            }
            if components.iter().any(|s: &ComponentSpec| s.id == c[0]) {
                return Err(Error::UnsupportedFeature(format!(
                    "duplicate component id {}",
                    c[0]
                )));
            }
            components.push(ComponentSpec {
                id: c[0],
                h,
                v,
                quant_table: c[2],
            });
        }
        let header = FrameHeader {
            marker,
            precision,
            width,
            height,
            components,
        };
        let (hmax, vmax) = header.max_sampling();
        for c in &header.components {
            if hmax % c.h != 0 || vmax % c.v != 0 {
                return Err(Error::UnsupportedFeature(format!(
                    "sampling factors {}x{} against {hmax}x{vmax}",
                    c.h, c.v
                )));
            }
        }
        Ok(header)
    }

    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6 + 3 * self.components.len());
        out.push(self.precision);
        push_u16(&mut out, self.height);
        push_u16(&mut out, self.width);
        out.push(self.components.len() as u8);
        for c in &self.components {
            out.extend_from_slice(&[c.id, (c.h << 4) | c.v, c.quant_table]);
        }
        out
    }

    pub fn max_sampling(&self) -> (u8, u8) {
        self.components
            .iter()
            .fold((1, 1), |(h, v), c| (h.max(c.h), v.max(c.v)))
    }

    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sof(precision: u8, w: u16, h: u16, comps: &[[u8; 3]]) -> Vec<u8> {
        let header = FrameHeader {
            marker: SOF0,
            precision,
            width: w,
            height: h,
            components: comps
                .iter()
                .map(|c| ComponentSpec {
                    id: c[0],
                    h: c[1] >> 4,
                    v: c[1] & 0xF,
                    quant_table: c[2],
                })
                .collect(),
        };
        header.payload()
    }

    #[test]
    fn reads_what_it_writes() -> Result<()> {
        let payload = sof(8, 33, 17, &[[1, 0x22, 0], [2, 0x11, 1], [3, 0x11, 1]]);
        let header = FrameHeader::read(SOF0, &payload)?;
        assert_eq!((header.width, header.height), (33, 17));
        assert_eq!(header.max_sampling(), (2, 2));
        assert_eq!(header.component_index(3), Some(2));
        assert_eq!(header.payload(), payload);
        Ok(())
    }

    #[test]
    fn rejects_unsupported() {
        let gray = sof(8, 8, 8, &[[1, 0x11, 0]]);
        assert!(matches!(
            FrameHeader::read(0xC2, &gray),
            Err(Error::UnsupportedFeature(_))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &sof(12, 8, 8, &[[1, 0x11, 0]])),
            Err(Error::UnsupportedFeature(_))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &sof(8, 8, 0, &[[1, 0x11, 0]])),
            Err(Error::UnsupportedFeature(_))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &sof(8, 8, 8, &[[1, 0x11, 0], [2, 0x11, 0]])),
            Err(Error::UnsupportedFeature(_))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &sof(8, 8, 8, &[[1, 0x50, 0]])),
            Err(Error::InvalidSampling(5, 0))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &sof(8, 8, 8, &[[1, 0x11, 4]])),
            Err(Error::InvalidTableId(4))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &sof(8, 8, 8, &[[1, 0x33, 0], [2, 0x22, 1], [3, 0x11, 1]])),
            Err(Error::UnsupportedFeature(_))
        ));
        assert!(matches!(
            FrameHeader::read(SOF0, &gray[..gray.len() - 1]),
            Err(Error::InvalidSegmentLength(SOF0, _))
        ));
    }
}
