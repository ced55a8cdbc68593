// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, WriteBytesExt};

use super::markers::*;
use crate::entropy_coding::huffman::HuffmanSpec;
use crate::error::{Error, Result};
use crate::frame::quantizer::QuantizationTable;

pub(crate) fn push_u16(out: &mut Vec<u8>, value: u16) {
    // Writing into a Vec cannot fail.
    let _ = out.write_u16::<BigEndian>(value);
}

/// Assembles a JPEG stream segment by segment.
#[derive(Debug, Default)]
pub struct MarkerWriter {
    out: Vec<u8>,
}

impl MarkerWriter {
    pub fn with_capacity(bytes: usize) -> MarkerWriter {
        MarkerWriter {
            out: Vec::with_capacity(bytes),
        }
    }

    /// Writes a marker without a payload.
    pub fn marker(&mut self, marker: u8) {
        self.out.extend_from_slice(&[0xFF, marker]);
    }

    /// Writes a marker followed by its length and `payload`.
    pub fn segment(&mut self, marker: u8, payload: &[u8]) -> Result<()> {
        let length = payload.len() + 2;
        let length: u16 = length
            .try_into()
            .map_err(|_| Error::InvalidSegmentLength(marker, length))?;
        self.marker(marker);
        push_u16(&mut self.out, length);
        self.out.extend_from_slice(payload);
        Ok(())
    }

    /// Appends an already stuffed entropy-coded segment.
    pub fn entropy_coded(&mut self, data: &[u8]) {
        self.out.extend_from_slice(data);
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

/// DQT payload for `tables`, each written with 8-bit precision unless an
/// entry needs 16.
pub fn dqt_payload(tables: &[(u8, &QuantizationTable)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (id, table) in tables {
        let values = table.values();
        if values.iter().all(|&q| q <= 255) {
            out.push(*id);
            out.extend(values.iter().map(|&q| q as u8));
        } else {
            out.push(0x10 | *id);
            for &q in values {
                push_u16(&mut out, q);
            }
        }
    }
    out
}

pub fn dht_payload(tables: &[(TableClass, u8, &HuffmanSpec)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (class, id, spec) in tables {
        out.push(((*class as u8) << 4) | *id);
        out.extend_from_slice(&spec.counts);
        out.extend_from_slice(&spec.symbols);
    }
    out
}

pub fn dri_payload(restart_interval: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(2);
    push_u16(&mut out, restart_interval);
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn segment_lengths() -> Result<()> {
        let mut w = MarkerWriter::default();
        w.marker(SOI);
        w.segment(COM, b"hi")?;
        w.segment(DRI, &dri_payload(0x1234))?;
        w.marker(EOI);
        assert_eq!(
            w.finish(),
            [0xFF, SOI, 0xFF, COM, 0, 4, b'h', b'i', 0xFF, DRI, 0, 4, 0x12, 0x34, 0xFF, EOI]
        );
        Ok(())
    }

    #[test]
    fn oversized_segment() {
        let mut w = MarkerWriter::default();
        assert!(matches!(
            w.segment(COM, &vec![0; 65534]),
            Err(Error::InvalidSegmentLength(COM, 65536))
        ));
    }

    #[test]
    fn dqt_precision() -> Result<()> {
        let small = QuantizationTable::new([3; 64])?;
        let large = QuantizationTable::new([300; 64])?;
        let payload = dqt_payload(&[(0, &small), (1, &large)]);
        assert_eq!(payload.len(), 65 + 129);
        assert_eq!(payload[0], 0x00);
        assert_eq!(payload[65], 0x11);
        assert_eq!(&payload[66..68], &[0x01, 0x2C]);
        Ok(())
    }
}
