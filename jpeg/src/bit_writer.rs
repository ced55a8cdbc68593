// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::headers::markers::RST0;

/// Accumulates bits, most significant first, into a byte-stuffed
/// entropy-coded segment.
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_buf: u64,
    bits_in_buf: usize,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> BitWriter {
        BitWriter {
            data: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Appends the low `num` bits of `bits`.
    pub fn write(&mut self, bits: u32, num: usize) {
        debug_assert!(num <= 24);
        if num == 0 {
            return;
        }
        let mask = (1u64 << num) - 1;
        self.bit_buf = (self.bit_buf << num) | (bits as u64 & mask);
        self.bits_in_buf += num;
        while self.bits_in_buf >= 8 {
            self.bits_in_buf -= 8;
            let byte = (self.bit_buf >> self.bits_in_buf) as u8;
            self.emit(byte);
        }
    }

    /// Pads the current byte with 1-bits.
    pub fn pad_to_byte(&mut self) {
        if self.bits_in_buf > 0 {
            let pad = 8 - self.bits_in_buf;
            self.write((1 << pad) - 1, pad);
        }
    }

    /// Byte-aligns and emits the unstuffed marker `RST{n & 7}`.
    pub fn write_restart_marker(&mut self, n: usize) {
        self.pad_to_byte();
        self.data.push(0xFF);
        self.data.push(RST0 + (n & 7) as u8);
    }

    /// Number of complete bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.data.len()
    }

    /// Byte-aligns the stream and returns the segment.
    pub fn finish(mut self) -> Vec<u8> {
        self.pad_to_byte();
        self.data
    }

    fn emit(&mut self, byte: u8) {
        self.data.push(byte);
        if byte == 0xFF {
            self.data.push(0x00);
        }
    }
}
