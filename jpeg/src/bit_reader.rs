// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::{Corruption, Error, Result};
use crate::headers::markers::{RST0, is_rst};
use crate::util::tracing_wrappers::*;

/// Reads bits, most significant first, from an entropy-coded segment.
///
/// `0xFF 0x00` pairs are unstuffed transparently and `0xFF` fill bytes are
/// skipped. The reader never consumes a marker on its own: when it reaches
/// one, refilling stops and further peeks see zero bits.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_buf: u64,
    bits_in_buf: usize,
    total_bits_read: usize,
    at_marker: bool,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], bit_buf: {:0width$b}, total_bits_read: {} }}",
            self.data.len(),
            self.bit_buf
                & 1u64
                    .checked_shl(self.bits_in_buf as u32)
                    .map_or(u64::MAX, |m| m - 1),
            self.total_bits_read,
            width = self.bits_in_buf
        )
    }
}

pub const MAX_BITS_PER_CALL: usize = 16;

impl<'a> BitReader<'a> {
    /// Constructs a BitReader over the bytes of one entropy-coded segment.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            bit_buf: 0,
            bits_in_buf: 0,
            total_bits_read: 0,
            at_marker: false,
        }
    }

    /// Returns the next `num` bits without consuming them. Past the end of
    /// the segment the missing bits read as zero.
    /// ```
    /// # use jpeg::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0b1010_0000]);
    /// assert_eq!(br.peek(3), 0b101);
    /// assert_eq!(br.peek(12), 0b1010_0000_0000);
    /// ```
    pub fn peek(&mut self, num: usize) -> u32 {
        debug_assert!(num <= MAX_BITS_PER_CALL);
        if num == 0 {
            return 0;
        }
        if self.bits_in_buf < num {
            self.refill();
        }
        let mask = (1u64 << num) - 1;
        if self.bits_in_buf >= num {
            ((self.bit_buf >> (self.bits_in_buf - num)) & mask) as u32
        } else {
            ((self.bit_buf << (num - self.bits_in_buf)) & mask) as u32
        }
    }

    /// Advances by `num` bits, which must have been available to `peek`.
    pub fn consume(&mut self, num: usize) -> Result<()> {
        if self.bits_in_buf < num {
            return Err(Error::CorruptEntropyStream(Corruption::OutOfBits));
        }
        self.bits_in_buf -= num;
        self.total_bits_read += num;
        Ok(())
    }

    /// Reads `num` bits.
    /// ```
    /// # use jpeg::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0xFF, 0x00, 0x80]);
    /// assert_eq!(br.read(8)?, 0xFF);
    /// assert_eq!(br.read(1)?, 1);
    /// assert_eq!(br.total_bits_read(), 9);
    /// assert!(br.read(8).is_err());
    /// # Ok::<(), jpeg::error::Error>(())
    /// ```
    pub fn read(&mut self, num: usize) -> Result<u32> {
        let ret = self.peek(num);
        self.consume(num)?;
        Ok(ret)
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> Result<u32> {
        self.read(1)
    }

    /// Returns the total number of bits that have been consumed.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }

    /// Discards the padding bits of the current interval and consumes the
    /// restart marker `RST{expected}` that must follow them.
    pub fn read_restart_marker(&mut self, expected: u8) -> Result<()> {
        self.total_bits_read += self.bits_in_buf;
        self.bit_buf = 0;
        self.bits_in_buf = 0;
        self.at_marker = false;
        // Fill bytes may precede the marker.
        while self.data.len() >= 2 && self.data[0] == 0xFF && self.data[1] == 0xFF {
            self.data = &self.data[1..];
        }
        match self.data {
            [0xFF, m, ..] if is_rst(*m) && *m - RST0 == expected => {
                trace!(expected, "restart marker");
                self.data = &self.data[2..];
                Ok(())
            }
            _ => Err(Error::CorruptEntropyStream(Corruption::MissingRestart(
                expected,
            ))),
        }
    }

    fn refill(&mut self) {
        while self.bits_in_buf <= 56 && !self.at_marker {
            let byte = match self.data {
                [] => return,
                [0xFF, 0x00, ..] => {
                    self.data = &self.data[2..];
                    0xFF
                }
                [0xFF, 0xFF, ..] => {
                    self.data = &self.data[1..];
                    continue;
                }
                [0xFF, _, ..] | [0xFF] => {
                    self.at_marker = true;
                    return;
                }
                [b, ..] => {
                    let b = *b;
                    self.data = &self.data[1..];
                    b
                }
            };
            self.bit_buf = (self.bit_buf << 8) | byte as u64;
            self.bits_in_buf += 8;
        }
    }
}
