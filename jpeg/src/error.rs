// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::entropy_coding::huffman::HUFFMAN_MAX_BITS;

/// What went wrong inside an entropy-coded segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// No Huffman code of length <= 16 matches the upcoming bits.
    InvalidCode,
    /// An AC run/size pair points past the 64th coefficient.
    AcOverrun(usize),
    /// A DC difference category beyond what 8-bit samples can produce.
    DcCategory(u8),
    /// The segment ended before the block was complete.
    OutOfBits,
    /// Expected RSTn (the payload) but found something else.
    MissingRestart(u8),
}

impl std::fmt::Display for Corruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCode => write!(f, "invalid Huffman code"),
            Self::AcOverrun(k) => write!(f, "AC run overruns block at coefficient {k}"),
            Self::DcCategory(c) => write!(f, "DC category {c} out of range"),
            Self::OutOfBits => write!(f, "ran out of bits"),
            Self::MissingRestart(n) => write!(f, "expected RST{n} marker"),
        }
    }
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed in something that cannot be encoded.
    InputValidation,
    /// The container structure is missing pieces or is malformed.
    FormatViolation,
    /// The entropy-coded payload cannot be decoded.
    StreamCorruption,
    /// Allocation failures and configured limits.
    Resource,
}

#[derive(Error, Debug)]
pub enum Error {
    // Input validation
    #[error("Invalid image dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),
    #[error("Invalid component count: {0}, expected 1 or 3")]
    InvalidComponentCount(usize),
    #[error("Invalid quality: {0}, expected 1..=100")]
    InvalidQuality(u8),
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    InvalidBufferSize { expected: usize, actual: usize },
    #[error("Comment too long: {0} bytes")]
    CommentTooLong(usize),
    // Container format
    #[error("Not a JPEG stream: expected SOI, found {0:02x}{1:02x}")]
    InvalidSignature(u8, u8),
    #[error("Missing required marker: {0}")]
    MissingRequiredMarker(&'static str),
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("Unexpected marker ff{0:02x}")]
    UnexpectedMarker(u8),
    #[error("Invalid length {1} for segment ff{0:02x}")]
    InvalidSegmentLength(u8, usize),
    #[error("Duplicate frame header")]
    DuplicateFrameHeader,
    #[error("Invalid table id {0}")]
    InvalidTableId(u8),
    #[error("Invalid table class {0}")]
    InvalidTableClass(u8),
    #[error("Invalid quantization table: zero entry at position {0}")]
    InvalidQuantizationTable(usize),
    #[error("Invalid Huffman table: {0}")]
    InvalidHuffmanTable(&'static str),
    #[error("Huffman code lengths exceed {} bits", HUFFMAN_MAX_BITS)]
    HuffmanLengthOverflow,
    #[error("Huffman table has no code for symbol {0:#04x}")]
    UnknownSymbol(u8),
    #[error("Invalid sampling factors {0}x{1}")]
    InvalidSampling(u8, u8),
    #[error("Scan references unknown component id {0}")]
    UnknownComponent(u8),
    #[error("File truncated")]
    FileTruncated,
    // Entropy-coded data
    #[error("Corrupt entropy-coded data: {0}")]
    CorruptEntropyStream(Corruption),
    // Resources
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Image too large: {0}x{1} exceeds the configured pixel limit")]
    ImageTooLarge(usize, usize),
    #[error("Too many scans: limit is {0}")]
    TooManyScans(usize),
    // Generic arithmetic overflow. Prefer using other errors if possible.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions(..)
            | Self::InvalidComponentCount(_)
            | Self::InvalidQuality(_)
            | Self::InvalidBufferSize { .. }
            | Self::CommentTooLong(_) => ErrorKind::InputValidation,
            Self::CorruptEntropyStream(_) => ErrorKind::StreamCorruption,
            Self::OutOfMemory(_)
            | Self::ImageTooLarge(..)
            | Self::TooManyScans(_)
            | Self::ArithmeticOverflow => ErrorKind::Resource,
            _ => ErrorKind::FormatViolation,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(Error::InvalidQuality(0).kind(), ErrorKind::InputValidation);
        assert_eq!(
            Error::MissingRequiredMarker("SOF").kind(),
            ErrorKind::FormatViolation
        );
        assert_eq!(
            Error::CorruptEntropyStream(Corruption::InvalidCode).kind(),
            ErrorKind::StreamCorruption
        );
        assert_eq!(Error::ImageTooLarge(1, 1).kind(), ErrorKind::Resource);
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::CorruptEntropyStream(Corruption::AcOverrun(70)).to_string(),
            "Corrupt entropy-coded data: AC run overruns block at coefficient 70"
        );
        assert_eq!(
            Error::HuffmanLengthOverflow.to_string(),
            "Huffman code lengths exceed 16 bits"
        );
    }
}
