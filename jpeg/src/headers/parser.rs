// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use num_traits::FromPrimitive;

use super::markers::*;
use crate::{BLOCK_SIZE, MAX_TABLES};
use crate::entropy_coding::huffman::{HUFFMAN_MAX_BITS, HuffmanSpec};
use crate::error::{Error, Result};
use crate::frame::quantizer::QuantizationTable;
use crate::util::tracing_wrappers::*;

/// Walks the marker structure of a JPEG stream.
#[derive(Debug)]
pub struct MarkerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MarkerReader<'a> {
    pub fn new(data: &'a [u8]) -> MarkerReader<'a> {
        MarkerReader { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consumes the SOI marker that every stream starts with.
    pub fn read_soi(&mut self) -> Result<()> {
        match self.data {
            [0xFF, SOI, ..] => {
                self.pos = 2;
                Ok(())
            }
            [a, b, ..] => Err(Error::InvalidSignature(*a, *b)),
            _ => Err(Error::FileTruncated),
        }
    }

    /// Returns the next marker code, skipping fill bytes. Stray bytes
    /// before it are skipped with a warning. Returns `None` at the end of
    /// the input.
    pub fn next_marker(&mut self) -> Option<u8> {
        loop {
            let start = self.pos;
            while self.pos < self.data.len() && self.data[self.pos] != 0xFF {
                self.pos += 1;
            }
            while self.pos < self.data.len() && self.data[self.pos] == 0xFF {
                self.pos += 1;
            }
            let &marker = self.data.get(self.pos)?;
            self.pos += 1;
            if marker == 0x00 {
                continue;
            }
            if self.pos - start > 2 && self.data[start] != 0xFF {
                warn!(
                    skipped = self.pos - start - 2,
                    marker, "extraneous bytes before marker"
                );
            }
            return Some(marker);
        }
    }

    /// Reads the length field of the segment started by `marker` and
    /// returns its payload.
    pub fn read_payload(&mut self, marker: u8) -> Result<&'a [u8]> {
        let rest = &self.data[self.pos..];
        if rest.len() < 2 {
            return Err(Error::FileTruncated);
        }
        let length = BigEndian::read_u16(rest) as usize;
        if length < 2 {
            return Err(Error::InvalidSegmentLength(marker, length));
        }
        if rest.len() < length {
            return Err(Error::FileTruncated);
        }
        self.pos += length;
        Ok(&rest[2..length])
    }

    /// Returns the entropy-coded data that starts at the current position,
    /// restart markers included, and advances past it.
    pub fn entropy_coded_segment(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        let len = entropy_segment_len(rest);
        self.pos += len;
        &rest[..len]
    }
}

/// Length of the entropy-coded data at the start of `data`: everything up
/// to the first marker that is neither a stuffed zero, a fill byte nor RSTn.
pub fn entropy_segment_len(data: &[u8]) -> usize {
    let mut i = 0;
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        match data[i + 1] {
            0x00 => i += 2,
            0xFF => i += 1,
            m if is_rst(m) => i += 2,
            _ => return i,
        }
    }
    data.len()
}

/// Parses every table of a DQT segment. Values stay in zig-zag order.
pub fn parse_dqt(payload: &[u8]) -> Result<Vec<(u8, QuantizationTable)>> {
    let invalid_length = || Error::InvalidSegmentLength(DQT, payload.len());
    let mut r = payload;
    let mut tables = Vec::new();
    while !r.is_empty() {
        let pq_tq = r.read_u8().map_err(|_| invalid_length())?;
        let (precision, id) = (pq_tq >> 4, pq_tq & 0xF);
        if id as usize >= MAX_TABLES {
            return Err(Error::InvalidTableId(id));
        }
        let mut values = [0u16; BLOCK_SIZE];
        match precision {
            0 => {
                for v in values.iter_mut() {
                    *v = r.read_u8().map_err(|_| invalid_length())? as u16;
                }
            }
            1 => {
                for v in values.iter_mut() {
                    *v = r.read_u16::<BigEndian>().map_err(|_| invalid_length())?;
                }
            }
            _ => {
                return Err(Error::UnsupportedFeature(format!(
                    "quantization table precision {precision}"
                )));
            }
        }
        trace!(id, precision, "DQT");
        tables.push((id, QuantizationTable::new(values)?));
    }
    Ok(tables)
}

/// Parses every table of a DHT segment.
pub fn parse_dht(payload: &[u8]) -> Result<Vec<(TableClass, u8, HuffmanSpec)>> {
    let invalid_length = || Error::InvalidSegmentLength(DHT, payload.len());
    let mut r = payload;
    let mut tables = Vec::new();
    while !r.is_empty() {
        let tc_th = r.read_u8().map_err(|_| invalid_length())?;
        let class = TableClass::from_u8(tc_th >> 4).ok_or(Error::InvalidTableClass(tc_th >> 4))?;
        let id = tc_th & 0xF;
        if id as usize >= MAX_TABLES {
            return Err(Error::InvalidTableId(id));
        }
        if r.len() < HUFFMAN_MAX_BITS {
            return Err(invalid_length());
        }
        let (counts, rest) = r.split_at(HUFFMAN_MAX_BITS);
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if rest.len() < total {
            return Err(invalid_length());
        }
        let (symbols, rest) = rest.split_at(total);
        let mut spec_counts = [0; HUFFMAN_MAX_BITS];
        spec_counts.copy_from_slice(counts);
        trace!(?class, id, total, "DHT");
        tables.push((class, id, HuffmanSpec::new(spec_counts, symbols)));
        r = rest;
    }
    Ok(tables)
}

pub fn parse_dri(payload: &[u8]) -> Result<u16> {
    if payload.len() != 2 {
        return Err(Error::InvalidSegmentLength(DRI, payload.len()));
    }
    Ok(BigEndian::read_u16(payload))
}

pub fn parse_com(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}
