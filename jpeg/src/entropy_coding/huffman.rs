// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::MAX_TABLES;
use crate::bit_reader::BitReader;
use crate::error::{Corruption, Error, Result};
use crate::headers::markers::TableClass;

pub const HUFFMAN_MAX_BITS: usize = 16;
const LOOKUP_BITS: usize = 9;

/// The DHT representation of a table: how many codes there are of each
/// length 1..=16, and the symbols in order of increasing code length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanSpec {
    pub counts: [u8; HUFFMAN_MAX_BITS],
    pub symbols: Vec<u8>,
}

impl HuffmanSpec {
    pub fn new(counts: [u8; HUFFMAN_MAX_BITS], symbols: &[u8]) -> HuffmanSpec {
        HuffmanSpec {
            counts,
            symbols: symbols.to_vec(),
        }
    }

    pub fn dc_luminance() -> HuffmanSpec {
        Self::new(DC_LUMINANCE_COUNTS, &DC_SYMBOLS)
    }

    pub fn dc_chrominance() -> HuffmanSpec {
        Self::new(DC_CHROMINANCE_COUNTS, &DC_SYMBOLS)
    }

    pub fn ac_luminance() -> HuffmanSpec {
        Self::new(AC_LUMINANCE_COUNTS, &AC_LUMINANCE_SYMBOLS)
    }

    pub fn ac_chrominance() -> HuffmanSpec {
        Self::new(AC_CHROMINANCE_COUNTS, &AC_CHROMINANCE_SYMBOLS)
    }
}

/// A canonical Huffman code usable in both directions.
#[derive(Clone)]
pub struct HuffmanTable {
    spec: HuffmanSpec,
    // Encoding: code and length per symbol, length 0 if absent.
    codes: [u16; 256],
    lengths: [u8; 256],
    // Decoding, indexed by code length.
    maxcode: [i32; HUFFMAN_MAX_BITS + 1],
    valoffset: [i32; HUFFMAN_MAX_BITS + 1],
    // (length << 8) | symbol for every code of at most LOOKUP_BITS bits.
    lookup: Vec<u16>,
}

impl Debug for HuffmanTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HuffmanTable {{ counts: {:?}, {} symbols }}",
            self.spec.counts,
            self.spec.symbols.len()
        )
    }
}

impl HuffmanTable {
    pub fn new(spec: &HuffmanSpec) -> Result<HuffmanTable> {
        let total: usize = spec.counts.iter().map(|&c| c as usize).sum();
        if total > 256 {
            return Err(Error::InvalidHuffmanTable("more than 256 symbols"));
        }
        if total != spec.symbols.len() {
            return Err(Error::InvalidHuffmanTable(
                "symbol count does not match code lengths",
            ));
        }
        let mut table = HuffmanTable {
            spec: spec.clone(),
            codes: [0; 256],
            lengths: [0; 256],
            maxcode: [-1; HUFFMAN_MAX_BITS + 1],
            valoffset: [0; HUFFMAN_MAX_BITS + 1],
            lookup: vec![0; 1 << LOOKUP_BITS],
        };
        let mut code = 0u32;
        let mut index = 0usize;
        for len in 1..=HUFFMAN_MAX_BITS {
            let count = spec.counts[len - 1] as usize;
            // Codes must fit in `len` bits and may not be all ones.
            if count > 0 && code as usize + count >= 1 << len {
                return Err(Error::InvalidHuffmanTable("code space overflow"));
            }
            if count > 0 {
                table.valoffset[len] = index as i32 - code as i32;
            }
            for &symbol in &spec.symbols[index..index + count] {
                // The first occurrence wins for duplicated symbols.
                if table.lengths[symbol as usize] == 0 {
                    table.codes[symbol as usize] = code as u16;
                    table.lengths[symbol as usize] = len as u8;
                }
                if len <= LOOKUP_BITS {
                    let shift = LOOKUP_BITS - len;
                    let first = (code as usize) << shift;
                    let entry = ((len as u16) << 8) | symbol as u16;
                    table.lookup[first..first + (1 << shift)].fill(entry);
                }
                code += 1;
            }
            index += count;
            if count > 0 {
                table.maxcode[len] = code as i32 - 1;
            }
            code <<= 1;
        }
        Ok(table)
    }

    pub fn spec(&self) -> &HuffmanSpec {
        &self.spec
    }

    /// Returns the code of `symbol` and its length in bits.
    pub fn code(&self, symbol: u8) -> Result<(u16, usize)> {
        match self.lengths[symbol as usize] {
            0 => Err(Error::UnknownSymbol(symbol)),
            len => Ok((self.codes[symbol as usize], len as usize)),
        }
    }

    /// Reads one symbol.
    pub fn decode(&self, br: &mut BitReader) -> Result<u8> {
        let entry = self.lookup[br.peek(LOOKUP_BITS) as usize];
        if entry != 0 {
            br.consume((entry >> 8) as usize)?;
            return Ok(entry as u8);
        }
        let bits = br.peek(HUFFMAN_MAX_BITS);
        for len in LOOKUP_BITS + 1..=HUFFMAN_MAX_BITS {
            let code = (bits >> (HUFFMAN_MAX_BITS - len)) as i32;
            if code <= self.maxcode[len] {
                br.consume(len)?;
                let index = (code + self.valoffset[len]) as usize;
                return Ok(self.spec.symbols[index]);
            }
        }
        Err(Error::CorruptEntropyStream(Corruption::InvalidCode))
    }
}

/// The DC and AC table slots of a frame.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTableSet {
    dc: [Option<HuffmanTable>; MAX_TABLES],
    ac: [Option<HuffmanTable>; MAX_TABLES],
}

impl HuffmanTableSet {
    pub fn new() -> HuffmanTableSet {
        Self::default()
    }

    /// The usual two-slot arrangement: luminance tables in slot 0 and
    /// chrominance tables in slot 1.
    pub fn standard() -> Result<HuffmanTableSet> {
        let mut set = Self::new();
        set.set(TableClass::Dc, 0, HuffmanTable::new(&HuffmanSpec::dc_luminance())?)?;
        set.set(TableClass::Ac, 0, HuffmanTable::new(&HuffmanSpec::ac_luminance())?)?;
        set.set(TableClass::Dc, 1, HuffmanTable::new(&HuffmanSpec::dc_chrominance())?)?;
        set.set(TableClass::Ac, 1, HuffmanTable::new(&HuffmanSpec::ac_chrominance())?)?;
        Ok(set)
    }

    fn slots(&self, class: TableClass) -> &[Option<HuffmanTable>; MAX_TABLES] {
        match class {
            TableClass::Dc => &self.dc,
            TableClass::Ac => &self.ac,
        }
    }

    pub fn set(&mut self, class: TableClass, id: u8, table: HuffmanTable) -> Result<()> {
        let slots = match class {
            TableClass::Dc => &mut self.dc,
            TableClass::Ac => &mut self.ac,
        };
        let slot = slots
            .get_mut(id as usize)
            .ok_or(Error::InvalidTableId(id))?;
        *slot = Some(table);
        Ok(())
    }

    pub fn get(&self, class: TableClass, id: u8) -> Result<&HuffmanTable> {
        self.slots(class)
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::MissingRequiredMarker("DHT"))
    }

    pub fn contains(&self, class: TableClass, id: u8) -> bool {
        self.get(class, id).is_ok()
    }

    /// Populated slots as (class, id, table), DC first.
    pub fn iter(&self) -> impl Iterator<Item = (TableClass, u8, &HuffmanTable)> {
        [TableClass::Dc, TableClass::Ac].into_iter().flat_map(move |class| {
            self.slots(class)
                .iter()
                .enumerate()
                .filter_map(move |(id, t)| t.as_ref().map(|t| (class, id as u8, t)))
        })
    }
}

const DC_SYMBOLS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const DC_LUMINANCE_COUNTS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];

const DC_CHROMINANCE_COUNTS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];

const AC_LUMINANCE_COUNTS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7d];

#[rustfmt::skip]
const AC_LUMINANCE_SYMBOLS: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12,
    0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08,
    0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16,
    0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
    0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59,
    0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79,
    0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98,
    0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6,
    0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4,
    0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea,
    0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

const AC_CHROMINANCE_COUNTS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 0x77];

#[rustfmt::skip]
const AC_CHROMINANCE_SYMBOLS: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21,
    0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91,
    0xa1, 0xb1, 0xc1, 0x09, 0x23, 0x33, 0x52, 0xf0,
    0x15, 0x62, 0x72, 0xd1, 0x0a, 0x16, 0x24, 0x34,
    0xe1, 0x25, 0xf1, 0x17, 0x18, 0x19, 0x1a, 0x26,
    0x27, 0x28, 0x29, 0x2a, 0x35, 0x36, 0x37, 0x38,
    0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58,
    0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78,
    0x79, 0x7a, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8a, 0x92, 0x93, 0x94, 0x95, 0x96,
    0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5,
    0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4,
    0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3,
    0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2,
    0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda,
    0xe2, 0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9,
    0xea, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];
