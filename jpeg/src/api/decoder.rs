// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::{Image, JpegDecoderLimits, JpegDecoderOptions, JpegInfo};
use crate::MAX_TABLES;
use crate::color::ycbcr::merge_planes;
use crate::entropy_coding::huffman::{HuffmanTable, HuffmanTableSet};
use crate::error::{Error, Result};
use crate::frame::decode::FrameDecoder;
use crate::frame::quantizer::QuantizationTable;
use crate::headers::markers::*;
use crate::headers::parser::{MarkerReader, parse_com, parse_dht, parse_dqt, parse_dri};
use crate::headers::{FrameHeader, JfifHeader, ScanHeader};
use crate::util::tracing_wrappers::*;

/// Tables and metadata defined so far in the stream.
#[derive(Debug, Default)]
struct StreamState {
    frame: Option<FrameHeader>,
    quant_tables: [Option<QuantizationTable>; MAX_TABLES],
    huffman_tables: HuffmanTableSet,
    restart_interval: u16,
    jfif: Option<JfifHeader>,
    comments: Vec<String>,
}

impl StreamState {
    fn read_frame_header(
        &mut self,
        marker: u8,
        payload: &[u8],
        limits: &JpegDecoderLimits,
    ) -> Result<&FrameHeader> {
        if self.frame.is_some() {
            return Err(Error::DuplicateFrameHeader);
        }
        let header = FrameHeader::read(marker, payload)?;
        limits.check_pixels(header.width as usize, header.height as usize)?;
        debug!(?header, "frame header");
        Ok(self.frame.insert(header))
    }

    /// Handles any marker other than SOFn, SOS and EOI.
    fn read_segment(&mut self, marker: u8, reader: &mut MarkerReader<'_>) -> Result<()> {
        match marker {
            SOI => return Err(Error::UnexpectedMarker(SOI)),
            DNL => return Err(Error::UnsupportedFeature("DNL marker".to_string())),
            DAC => return Err(Error::UnsupportedFeature("arithmetic coding".to_string())),
            m if is_standalone(m) => {
                debug!(marker, "ignoring standalone marker");
                return Ok(());
            }
            _ => {}
        }
        let payload = reader.read_payload(marker)?;
        match marker {
            DQT => {
                for (id, table) in parse_dqt(payload)? {
                    self.quant_tables[id as usize] = Some(table);
                }
            }
            DHT => {
                for (class, id, spec) in parse_dht(payload)? {
                    self.huffman_tables
                        .set(class, id, HuffmanTable::new(&spec)?)?;
                }
            }
            DRI => {
                self.restart_interval = parse_dri(payload)?;
                debug!(restart_interval = self.restart_interval, "DRI");
            }
            COM => self.comments.push(parse_com(payload)),
            APP0 if self.jfif.is_none() => self.jfif = JfifHeader::read(payload),
            _ => {
                debug!(marker, len = payload.len(), "skipping segment");
            }
        }
        Ok(())
    }
}

/// Baseline JPEG decoder.
///
/// ```
/// use jpeg::{JpegDecoder, JpegDecoderLimits, JpegDecoderOptions, ChromaUpsampling};
///
/// let encoded = jpeg::encode(&[90u8; 8 * 8 * 3], 8, 8, 3, 80)?;
/// let mut options = JpegDecoderOptions::default();
/// options.limits = JpegDecoderLimits::restrictive();
/// options.upsampling = ChromaUpsampling::Nearest;
/// let image = JpegDecoder::new(options).decode(&encoded)?;
/// assert_eq!(image.pixels.len(), 8 * 8 * 3);
/// # Ok::<(), jpeg::error::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct JpegDecoder {
    options: JpegDecoderOptions,
}

impl JpegDecoder {
    pub fn new(options: JpegDecoderOptions) -> JpegDecoder {
        JpegDecoder { options }
    }

    pub fn options(&self) -> &JpegDecoderOptions {
        &self.options
    }

    /// Decodes a complete stream to interleaved gray or RGB samples.
    ///
    /// A stream that ends without EOI is accepted once every component has
    /// been decoded.
    pub fn decode(&self, data: &[u8]) -> Result<Image> {
        let limits = &self.options.limits;
        let mut reader = MarkerReader::new(data);
        reader.read_soi()?;
        let mut state = StreamState::default();
        let mut frame: Option<FrameDecoder> = None;
        let mut scans = 0;
        let mut saw_eoi = false;
        while let Some(marker) = reader.next_marker() {
            match marker {
                EOI => {
                    saw_eoi = true;
                    break;
                }
                SOS => {
                    let payload = reader.read_payload(SOS)?;
                    let (Some(header), Some(decoder)) = (&state.frame, frame.as_mut()) else {
                        return Err(Error::MissingRequiredMarker("SOF"));
                    };
                    let scan = ScanHeader::read(payload, header)?;
                    scans += 1;
                    limits.check_scans(scans)?;
                    decoder.decode_scan(
                        reader.entropy_coded_segment(),
                        &scan,
                        &state.quant_tables,
                        &state.huffman_tables,
                        state.restart_interval as usize,
                    )?;
                }
                m if is_sof(m) => {
                    let payload = reader.read_payload(m)?;
                    let header = state.read_frame_header(m, payload, limits)?;
                    frame = Some(FrameDecoder::new(header)?);
                }
                m => state.read_segment(m, &mut reader)?,
            }
        }

        let Some(frame) = frame else {
            return Err(Error::MissingRequiredMarker("SOF"));
        };
        if !frame.is_complete() {
            return Err(if saw_eoi {
                Error::MissingRequiredMarker("SOS")
            } else {
                Error::FileTruncated
            });
        }
        if !saw_eoi {
            warn!("stream ends without EOI");
        }
        let (width, height) = (frame.layout().width, frame.layout().height);
        let planes = frame.into_planes(self.options.upsampling)?;
        let pixels = merge_planes(&planes)?;
        Ok(Image {
            width,
            height,
            components: planes.len(),
            pixels,
        })
    }

    /// Parses the headers up to the first scan.
    pub fn read_info(&self, data: &[u8]) -> Result<JpegInfo> {
        let mut reader = MarkerReader::new(data);
        reader.read_soi()?;
        let mut state = StreamState::default();
        while let Some(marker) = reader.next_marker() {
            match marker {
                SOS | EOI => break,
                m if is_sof(m) => {
                    let payload = reader.read_payload(m)?;
                    state.read_frame_header(m, payload, &self.options.limits)?;
                }
                m => state.read_segment(m, &mut reader)?,
            }
        }
        let frame = state.frame.ok_or(Error::MissingRequiredMarker("SOF"))?;
        Ok(JpegInfo {
            width: frame.width as usize,
            height: frame.height as usize,
            components: frame.components,
            jfif: state.jfif,
            restart_interval: state.restart_interval,
            comments: state.comments,
        })
    }
}

/// Decodes `data` with default options.
pub fn decode(data: &[u8]) -> Result<Image> {
    JpegDecoder::default().decode(data)
}

/// Reads the stream headers of `data` with default options.
pub fn read_info(data: &[u8]) -> Result<JpegInfo> {
    JpegDecoder::default().read_info(data)
}
