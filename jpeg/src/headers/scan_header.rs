// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::frame_header::FrameHeader;
use super::markers::SOS;
use crate::MAX_TABLES;
use crate::error::{Error, Result};

/// A component taking part in a scan, with its entropy table selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into the frame's component list.
    pub component_index: usize,
    pub dc_table: u8,
    pub ac_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
    pub spectral_start: u8,
    pub spectral_end: u8,
    pub approx_high: u8,
    pub approx_low: u8,
}

impl ScanHeader {
    /// A sequential scan over all 64 coefficients.
    pub fn sequential(components: Vec<ScanComponent>) -> ScanHeader {
        ScanHeader {
            components,
            spectral_start: 0,
            spectral_end: 63,
            approx_high: 0,
            approx_low: 0,
        }
    }

    pub fn read(payload: &[u8], frame: &FrameHeader) -> Result<ScanHeader> {
        let invalid_length = || Error::InvalidSegmentLength(SOS, payload.len());
        let (&num_components, rest) = payload.split_first().ok_or_else(invalid_length)?;
        let num_components = num_components as usize;
        if rest.len() != 2 * num_components + 3 {
            return Err(invalid_length());
        }
        if num_components == 0 || num_components > frame.components.len() {
            return Err(Error::UnsupportedFeature(format!(
                "scan with {num_components} components"
            )));
        }
        let (selectors, params) = rest.split_at(2 * num_components);
        let mut components: Vec<ScanComponent> = Vec::with_capacity(num_components);
        for s in selectors.chunks_exact(2) {
            let component_index = frame
                .component_index(s[0])
                .ok_or(Error::UnknownComponent(s[0]))?;
            if components
                .iter()
                .any(|c| c.component_index == component_index)
            {
                return Err(Error::UnsupportedFeature(format!(
                    "component {} repeated in scan",
                    s[0]
                )));
            }
            let (dc_table, ac_table) = (s[1] >> 4, s[1] & 0xF);
            for id in [dc_table, ac_table] {
                if id as usize >= MAX_TABLES {
                    return Err(Error::InvalidTableId(id));
                }
            }
            components.push(ScanComponent {
                component_index,
                dc_table,
                ac_table,
            });
        }
        let header = ScanHeader {
            components,
            spectral_start: params[0],
            spectral_end: params[1],
            approx_high: params[2] >> 4,
            approx_low: params[2] & 0xF,
        };
        if header.spectral_start != 0
            || header.spectral_end != 63
            || header.approx_high != 0
            || header.approx_low != 0
        {
            return Err(Error::UnsupportedFeature(format!(
                "spectral selection {}..={} with approximation {}/{}",
                header.spectral_start,
                header.spectral_end,
                header.approx_high,
                header.approx_low
            )));
        }
        Ok(header)
    }

    pub fn payload(&self, frame: &FrameHeader) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 2 * self.components.len());
        out.push(self.components.len() as u8);
        for c in &self.components {
            out.push(frame.components[c.component_index].id);
            out.push((c.dc_table << 4) | c.ac_table);
        }
        out.push(self.spectral_start);
        out.push(self.spectral_end);
        out.push((self.approx_high << 4) | self.approx_low);
        out
    }
}
