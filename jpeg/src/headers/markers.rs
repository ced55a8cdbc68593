// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;

pub const TEM: u8 = 0x01;
pub const SOF0: u8 = 0xC0;
pub const SOF1: u8 = 0xC1;
pub const DHT: u8 = 0xC4;
pub const JPG: u8 = 0xC8;
pub const DAC: u8 = 0xCC;
pub const RST0: u8 = 0xD0;
pub const RST7: u8 = 0xD7;
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const DQT: u8 = 0xDB;
pub const DNL: u8 = 0xDC;
pub const DRI: u8 = 0xDD;
pub const APP0: u8 = 0xE0;
pub const APP15: u8 = 0xEF;
pub const COM: u8 = 0xFE;

pub fn is_rst(marker: u8) -> bool {
    (RST0..=RST7).contains(&marker)
}

/// Whether `marker` stands alone, without a length and payload.
pub fn is_standalone(marker: u8) -> bool {
    marker == SOI || marker == EOI || marker == TEM || is_rst(marker)
}

/// Whether `marker` starts a frame (SOF0..SOF15, excluding DHT, JPG and DAC).
pub fn is_sof(marker: u8) -> bool {
    (SOF0..=0xCF).contains(&marker) && marker != DHT && marker != JPG && marker != DAC
}

pub fn sof_name(marker: u8) -> &'static str {
    match marker {
        0xC0 => "baseline DCT",
        0xC1 => "extended sequential DCT",
        0xC2 => "progressive DCT",
        0xC3 => "lossless",
        0xC5 => "differential sequential DCT",
        0xC6 => "differential progressive DCT",
        0xC7 => "differential lossless",
        0xC9 => "extended sequential DCT, arithmetic coding",
        0xCA => "progressive DCT, arithmetic coding",
        0xCB => "lossless, arithmetic coding",
        0xCD => "differential sequential DCT, arithmetic coding",
        0xCE => "differential progressive DCT, arithmetic coding",
        0xCF => "differential lossless, arithmetic coding",
        _ => "unknown frame type",
    }
}

#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}
