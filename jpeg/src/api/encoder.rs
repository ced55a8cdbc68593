// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::JpegEncoderOptions;
use crate::bit_writer::BitWriter;
use crate::color::sampling::downsample;
use crate::color::ycbcr::split_planes;
use crate::entropy_coding::block::{HuffmanEncoder, SymbolCounter};
use crate::entropy_coding::huffman::HuffmanTableSet;
use crate::error::{Error, Result};
use crate::frame::encode::{QuantizedComponent, encode_scan, quantize_component};
use crate::frame::mcu::FrameLayout;
use crate::frame::quantizer::QuantizationTable;
use crate::headers::markers::*;
use crate::headers::writer::{MarkerWriter, dht_payload, dqt_payload, dri_payload};
use crate::headers::{ComponentSpec, FrameHeader, JfifHeader, ScanComponent, ScanHeader};
use crate::util::tracing_wrappers::*;

/// COM payloads are limited by the 16-bit segment length.
const MAX_COMMENT_LEN: usize = u16::MAX as usize - 2;

/// Baseline JPEG encoder.
///
/// Quantization and Huffman tables are built once in [`JpegEncoder::new`];
/// afterwards the encoder is immutable and can be shared between threads.
///
/// ```
/// use jpeg::{JpegEncoder, JpegEncoderOptions, ChromaSubsampling};
///
/// let mut options = JpegEncoderOptions::with_quality(90);
/// options.subsampling = ChromaSubsampling::Yuv420;
/// options.restart_interval = 4;
/// let encoder = JpegEncoder::new(options)?;
/// let rgb = vec![200u8; 32 * 24 * 3];
/// let encoded = encoder.encode(&rgb, 32, 24, 3)?;
/// assert_eq!(&encoded[..2], &[0xFF, 0xD8]);
/// # Ok::<(), jpeg::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JpegEncoder {
    options: JpegEncoderOptions,
    luma_quant: QuantizationTable,
    chroma_quant: QuantizationTable,
    huffman: HuffmanTableSet,
}

impl JpegEncoder {
    pub fn new(options: JpegEncoderOptions) -> Result<JpegEncoder> {
        let comment_len = options.comment.as_ref().map_or(0, String::len);
        if comment_len > MAX_COMMENT_LEN {
            return Err(Error::CommentTooLong(comment_len));
        }
        let luma_quant =
            QuantizationTable::from_quality(&options.quant_tables.luminance, options.quality)?;
        let chroma_quant =
            QuantizationTable::from_quality(&options.quant_tables.chrominance, options.quality)?;
        Ok(JpegEncoder {
            luma_quant,
            chroma_quant,
            huffman: HuffmanTableSet::standard()?,
            options,
        })
    }

    pub fn options(&self) -> &JpegEncoderOptions {
        &self.options
    }

    /// Encodes interleaved 8-bit `pixels` (gray or RGB, per `components`)
    /// into a complete JPEG stream.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        components: usize,
    ) -> Result<Vec<u8>> {
        let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(Error::InvalidDimensions(width, height)),
        };
        let planes = split_planes(pixels, width, height, components)?;
        debug!(
            width,
            height,
            components,
            quality = self.options.quality,
            "encoding"
        );

        let frame = self.frame_header(w16, h16, components);
        let layout = FrameLayout::new(&frame);
        let mut quantized = Vec::with_capacity(components);
        for (c, plane) in planes.iter().enumerate() {
            let comp = &layout.components[c];
            let (h_ratio, v_ratio) = comp.upsampling(layout.h_max, layout.v_max);
            let table = self.quant_table(c);
            let q = if (h_ratio, v_ratio) == (1, 1) {
                quantize_component(plane, comp, table)?
            } else {
                let small = downsample(plane, h_ratio, v_ratio, (comp.width, comp.height))?;
                quantize_component(&small, comp, table)?
            };
            quantized.push(q);
        }

        let scans = self.scan_headers(components);
        let restart_interval = self.options.restart_interval as usize;
        let optimized;
        let tables = if self.options.optimize_huffman {
            let mut counter = SymbolCounter::new();
            for scan in &scans {
                encode_scan(&mut counter, &layout, scan, &quantized, restart_interval)?;
            }
            optimized = counter.optimal_tables()?;
            &optimized
        } else {
            &self.huffman
        };

        let mut out = MarkerWriter::with_capacity(width * height * components / 4 + 1024);
        self.write_headers(&mut out, &frame, &scans, tables)?;
        for scan in &scans {
            out.segment(SOS, &scan.payload(&frame))?;
            out.entropy_coded(&encode_entropy_segment(
                tables,
                &layout,
                scan,
                &quantized,
                restart_interval,
            )?);
        }
        out.marker(EOI);
        let encoded = out.finish();
        debug!(bytes = encoded.len(), "encoded");
        Ok(encoded)
    }

    fn quant_table(&self, component: usize) -> &QuantizationTable {
        if component == 0 {
            &self.luma_quant
        } else {
            &self.chroma_quant
        }
    }

    fn frame_header(&self, width: u16, height: u16, components: usize) -> FrameHeader {
        let components = (0..components)
            .map(|c| {
                let (h, v) = if c == 0 && components > 1 {
                    self.options.subsampling.luma_sampling()
                } else {
                    (1, 1)
                };
                ComponentSpec {
                    id: c as u8 + 1,
                    h,
                    v,
                    quant_table: (c > 0) as u8,
                }
            })
            .collect();
        FrameHeader::baseline(width, height, components)
    }

    fn scan_headers(&self, components: usize) -> Vec<ScanHeader> {
        let scan_component = |c: usize| ScanComponent {
            component_index: c,
            dc_table: (c > 0) as u8,
            ac_table: (c > 0) as u8,
        };
        if self.options.separate_scans {
            (0..components)
                .map(|c| ScanHeader::sequential(vec![scan_component(c)]))
                .collect()
        } else {
            vec![ScanHeader::sequential(
                (0..components).map(scan_component).collect(),
            )]
        }
    }

    // Everything between SOI and the first SOS.
    fn write_headers(
        &self,
        out: &mut MarkerWriter,
        frame: &FrameHeader,
        scans: &[ScanHeader],
        tables: &HuffmanTableSet,
    ) -> Result<()> {
        out.marker(SOI);
        if self.options.write_jfif {
            out.segment(APP0, &JfifHeader::default().payload())?;
        }
        if let Some(comment) = &self.options.comment {
            out.segment(COM, comment.as_bytes())?;
        }
        let mut quant = vec![(0, &self.luma_quant)];
        if frame.components.len() > 1 {
            quant.push((1, &self.chroma_quant));
        }
        out.segment(DQT, &dqt_payload(&quant))?;
        out.segment(SOF0, &frame.payload())?;

        // Only the tables some scan refers to.
        let used = |class: TableClass, id: u8| {
            scans.iter().flat_map(|s| &s.components).any(|c| match class {
                TableClass::Dc => c.dc_table == id,
                TableClass::Ac => c.ac_table == id,
            })
        };
        let huffman: Vec<_> = tables
            .iter()
            .filter(|(class, id, _)| used(*class, *id))
            .map(|(class, id, table)| (class, id, table.spec()))
            .collect();
        trace!(tables = huffman.len(), "writing DHT");
        out.segment(DHT, &dht_payload(&huffman))?;
        if self.options.restart_interval > 0 {
            out.segment(DRI, &dri_payload(self.options.restart_interval))?;
        }
        Ok(())
    }
}

fn encode_entropy_segment(
    tables: &HuffmanTableSet,
    layout: &FrameLayout,
    scan: &ScanHeader,
    quantized: &[QuantizedComponent],
    restart_interval: usize,
) -> Result<Vec<u8>> {
    let blocks: usize = scan
        .components
        .iter()
        .map(|c| quantized[c.component_index].blocks.len())
        .sum();
    let mut encoder = HuffmanEncoder::new(tables, BitWriter::with_capacity(blocks * 16));
    encode_scan(&mut encoder, layout, scan, quantized, restart_interval)?;
    Ok(encoder.finish())
}

/// Encodes `pixels` with default options at the given IJG `quality`.
pub fn encode(
    pixels: &[u8],
    width: usize,
    height: usize,
    components: usize,
    quality: u8,
) -> Result<Vec<u8>> {
    JpegEncoder::new(JpegEncoderOptions::with_quality(quality))?.encode(
        pixels, width, height, components,
    )
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::headers::parser::MarkerReader;

    fn assert_send_sync<T: Send + Sync>() {}

    fn markers(data: &[u8]) -> Result<Vec<u8>> {
        let mut reader = MarkerReader::new(data);
        reader.read_soi()?;
        let mut found = vec![];
        while let Some(marker) = reader.next_marker() {
            found.push(marker);
            match marker {
                EOI => break,
                SOS => {
                    reader.read_payload(marker)?;
                    reader.entropy_coded_segment();
                }
                _ => {
                    reader.read_payload(marker)?;
                }
            }
        }
        Ok(found)
    }

    #[test]
    fn encoder_is_send_sync() {
        assert_send_sync::<JpegEncoder>();
    }

    #[test]
    fn invalid_inputs() {
        let pixels = [0u8; 12];
        assert!(matches!(
            encode(&pixels, 0, 4, 3, 75),
            Err(Error::InvalidDimensions(0, 4))
        ));
        assert!(matches!(
            encode(&pixels, 70000, 1, 1, 75),
            Err(Error::InvalidDimensions(70000, 1))
        ));
        assert!(matches!(
            encode(&pixels, 2, 2, 2, 75),
            Err(Error::InvalidComponentCount(2))
        ));
        assert!(matches!(
            encode(&pixels, 2, 2, 3, 0),
            Err(Error::InvalidQuality(0))
        ));
        assert!(matches!(
            encode(&pixels, 2, 2, 3, 101),
            Err(Error::InvalidQuality(101))
        ));
        assert!(matches!(
            encode(&pixels, 3, 3, 1, 75),
            Err(Error::InvalidBufferSize {
                expected: 9,
                actual: 12
            })
        ));
    }

    #[test]
    fn comment_too_long() {
        let mut options = JpegEncoderOptions::default();
        options.comment = Some("x".repeat(MAX_COMMENT_LEN + 1));
        assert!(matches!(
            JpegEncoder::new(options),
            Err(Error::CommentTooLong(65534))
        ));
    }

    #[test]
    fn segment_order() -> Result<()> {
        let mut options = JpegEncoderOptions::default();
        options.comment = Some("hello".to_string());
        options.restart_interval = 2;
        let encoded = JpegEncoder::new(options)?.encode(&[10u8; 8 * 8 * 3], 8, 8, 3)?;
        assert_eq!(
            markers(&encoded)?,
            vec![APP0, COM, DQT, SOF0, DHT, DRI, SOS, EOI]
        );
        Ok(())
    }

    #[test]
    fn separate_scans_without_jfif() -> Result<()> {
        let mut options = JpegEncoderOptions::default();
        options.separate_scans = true;
        options.write_jfif = false;
        let encoded = JpegEncoder::new(options)?.encode(&[10u8; 8 * 8 * 3], 8, 8, 3)?;
        assert_eq!(
            markers(&encoded)?,
            vec![DQT, SOF0, DHT, SOS, SOS, SOS, EOI]
        );
        Ok(())
    }

    #[test]
    fn grayscale_writes_one_table_of_each() -> Result<()> {
        let encoded = encode(&[128u8; 64], 8, 8, 1, 75)?;
        let mut reader = MarkerReader::new(&encoded);
        reader.read_soi()?;
        while let Some(marker) = reader.next_marker() {
            let payload = reader.read_payload(marker)?;
            match marker {
                // Pq/Tq byte plus 64 entries.
                DQT => assert_eq!(payload.len(), 65),
                DHT => {
                    let tables = crate::headers::parser::parse_dht(payload)?;
                    assert_eq!(tables.len(), 2);
                    assert!(tables.iter().all(|&(_, id, _)| id == 0));
                }
                SOS => break,
                _ => {}
            }
        }
        Ok(())
    }

    #[test]
    fn optimized_tables_are_smaller() -> Result<()> {
        let pixels: Vec<u8> = (0..64 * 64).map(|i| ((i % 64) * 4) as u8).collect();
        let standard = encode(&pixels, 64, 64, 1, 90)?;
        let mut options = JpegEncoderOptions::with_quality(90);
        options.optimize_huffman = true;
        let optimized = JpegEncoder::new(options)?.encode(&pixels, 64, 64, 1)?;
        assert!(optimized.len() < standard.len());
        Ok(())
    }
}
