// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::mcu::FrameLayout;
use super::quantizer::QuantizationTable;
use crate::api::ChromaUpsampling;
use crate::bit_reader::BitReader;
use crate::color::sampling::upsample;
use crate::entropy_coding::block::{DcPredictors, decode_block};
use crate::entropy_coding::huffman::{HuffmanTable, HuffmanTableSet};
use crate::error::{Error, Result};
use crate::headers::markers::TableClass;
use crate::headers::{FrameHeader, ScanHeader};
use crate::image::Plane;
use crate::util::tracing_wrappers::*;
use crate::var_dct::dct::inverse_dct_8x8;
use crate::{BLOCK_DIM, BLOCK_SIZE, MAX_TABLES};

/// Reconstructed samples of a frame, filled scan by scan.
#[derive(Debug)]
pub struct FrameDecoder {
    layout: FrameLayout,
    quant_table_ids: Vec<u8>,
    // One plane per component, covering the whole block grid.
    planes: Vec<Plane<f32>>,
    scanned: Vec<bool>,
}

impl FrameDecoder {
    pub fn new(frame: &FrameHeader) -> Result<FrameDecoder> {
        let layout = FrameLayout::new(frame);
        let planes = layout
            .components
            .iter()
            .map(|c| Plane::new((c.blocks_x * BLOCK_DIM, c.blocks_y * BLOCK_DIM)))
            .collect::<Result<Vec<_>>>()?;
        Ok(FrameDecoder {
            quant_table_ids: frame.components.iter().map(|c| c.quant_table).collect(),
            scanned: vec![false; layout.components.len()],
            layout,
            planes,
        })
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Decodes the entropy-coded segment `data` of `scan`, using the tables
    /// defined at this point of the stream.
    pub fn decode_scan(
        &mut self,
        data: &[u8],
        scan: &ScanHeader,
        quant_tables: &[Option<QuantizationTable>; MAX_TABLES],
        huffman_tables: &HuffmanTableSet,
        restart_interval: usize,
    ) -> Result<()> {
        let mut tables: Vec<(&QuantizationTable, &HuffmanTable, &HuffmanTable)> = Vec::new();
        for sc in &scan.components {
            let quant_id = self.quant_table_ids[sc.component_index] as usize;
            let quant = quant_tables[quant_id]
                .as_ref()
                .ok_or(Error::MissingRequiredMarker("DQT"))?;
            tables.push((
                quant,
                huffman_tables.get(TableClass::Dc, sc.dc_table)?,
                huffman_tables.get(TableClass::Ac, sc.ac_table)?,
            ));
        }
        let scan_components: Vec<usize> = scan.components.iter().map(|c| c.component_index).collect();
        let mcu_count = self.layout.mcu_count(&scan_components);
        debug!(?scan_components, mcu_count, bytes = data.len(), "decoding scan");

        let mut br = BitReader::new(data);
        let mut predictors = DcPredictors::new();
        let mut blocks = Vec::new();
        let mut levels = [0i16; BLOCK_SIZE];
        let mut samples = [0.0f32; BLOCK_SIZE];
        for mcu in 0..mcu_count {
            if restart_interval > 0 && mcu > 0 && mcu % restart_interval == 0 {
                br.read_restart_marker(((mcu / restart_interval - 1) % 8) as u8)?;
                predictors.reset();
            }
            self.layout.mcu_blocks(&scan_components, mcu, &mut blocks);
            for pos in &blocks {
                let component = scan_components[pos.scan_component];
                let (quant, dc, ac) = tables[pos.scan_component];
                decode_block(&mut br, dc, ac, &mut predictors, component, &mut levels)?;
                quant.dequantize_block(&levels, &mut samples);
                inverse_dct_8x8(&mut samples);
                let plane = &mut self.planes[component];
                for (y, row) in samples.chunks_exact(BLOCK_DIM).enumerate() {
                    let x0 = pos.bx * BLOCK_DIM;
                    let out = &mut plane.row_mut(pos.by * BLOCK_DIM + y)[x0..x0 + BLOCK_DIM];
                    for (o, &s) in out.iter_mut().zip(row) {
                        *o = s + 128.0;
                    }
                }
            }
        }
        trace!(bits = br.total_bits_read(), "scan done");
        for &c in &scan_components {
            self.scanned[c] = true;
        }
        Ok(())
    }

    /// Whether every component has been covered by some scan.
    pub fn is_complete(&self) -> bool {
        self.scanned.iter().all(|&s| s)
    }

    /// Crops every component to its sample size and upsamples it to the
    /// full image size.
    pub fn into_planes(self, upsampling: ChromaUpsampling) -> Result<Vec<Plane<f32>>> {
        let layout = self.layout;
        let full = (layout.width, layout.height);
        let mut out = Vec::with_capacity(self.planes.len());
        for (padded, comp) in self.planes.into_iter().zip(layout.components.iter()) {
            let mut plane = Plane::new((comp.width, comp.height))?;
            for y in 0..comp.height {
                plane
                    .row_mut(y)
                    .copy_from_slice(&padded.row(y)[..comp.width]);
            }
            let (h_ratio, v_ratio) = comp.upsampling(layout.h_max, layout.v_max);
            if (h_ratio, v_ratio) != (1, 1) {
                plane = upsample(&plane, h_ratio, v_ratio, full, upsampling)?;
            }
            out.push(plane);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::bit_writer::BitWriter;
    use crate::entropy_coding::block::HuffmanEncoder;
    use crate::error::Corruption;
    use crate::frame::encode::{encode_scan, quantize_component};
    use crate::headers::{ComponentSpec, ScanComponent};

    fn gray_frame(width: u16, height: u16) -> FrameHeader {
        FrameHeader::baseline(
            width,
            height,
            vec![ComponentSpec {
                id: 1,
                h: 1,
                v: 1,
                quant_table: 0,
            }],
        )
    }

    fn gray_scan() -> ScanHeader {
        ScanHeader::sequential(vec![ScanComponent {
            component_index: 0,
            dc_table: 0,
            ac_table: 0,
        }])
    }

    fn encode_gradient(
        frame: &FrameHeader,
        table: &QuantizationTable,
        restart_interval: usize,
    ) -> Result<Vec<u8>> {
        let layout = FrameLayout::new(frame);
        let (w, h) = (layout.width, layout.height);
        let mut plane = Plane::new((w, h))?;
        for y in 0..h {
            for (x, v) in plane.row_mut(y).iter_mut().enumerate() {
                *v = ((x * 3 + y * 2) % 256) as f32;
            }
        }
        let quantized = quantize_component(&plane, &layout.components[0], table)?;
        let tables = HuffmanTableSet::standard()?;
        let mut encoder = HuffmanEncoder::new(&tables, BitWriter::new());
        encode_scan(&mut encoder, &layout, &gray_scan(), &[quantized], restart_interval)?;
        Ok(encoder.finish())
    }

    fn quant_slots(table: QuantizationTable) -> [Option<QuantizationTable>; MAX_TABLES] {
        [Some(table), None, None, None]
    }

    #[test]
    fn decodes_gradient() -> Result<()> {
        let frame = gray_frame(20, 12);
        let table = QuantizationTable::new([1; BLOCK_SIZE])?;
        for restart_interval in [0, 1, 4] {
            let data = encode_gradient(&frame, &table, restart_interval)?;
            let mut decoder = FrameDecoder::new(&frame)?;
            assert!(!decoder.is_complete());
            decoder.decode_scan(
                &data,
                &gray_scan(),
                &quant_slots(table.clone()),
                &HuffmanTableSet::standard()?,
                restart_interval,
            )?;
            assert!(decoder.is_complete());
            let planes = decoder.into_planes(ChromaUpsampling::Triangle)?;
            assert_eq!(planes[0].size(), (20, 12));
            for y in 0..12 {
                for (x, &v) in planes[0].row(y).iter().enumerate() {
                    let expected = ((x * 3 + y * 2) % 256) as f32;
                    assert!((v - expected).abs() <= 2.0, "{x},{y}: {v} vs {expected}");
                }
            }
        }
        Ok(())
    }

    #[test]
    fn missing_tables() -> Result<()> {
        let frame = gray_frame(8, 8);
        let mut decoder = FrameDecoder::new(&frame)?;
        let none = [None, None, None, None];
        assert!(matches!(
            decoder.decode_scan(&[], &gray_scan(), &none, &HuffmanTableSet::standard()?, 0),
            Err(Error::MissingRequiredMarker("DQT"))
        ));
        let table = QuantizationTable::new([1; BLOCK_SIZE])?;
        assert!(matches!(
            decoder.decode_scan(&[], &gray_scan(), &quant_slots(table), &HuffmanTableSet::new(), 0),
            Err(Error::MissingRequiredMarker("DHT"))
        ));
        Ok(())
    }

    #[test]
    fn missing_restart_marker() -> Result<()> {
        let frame = gray_frame(16, 8);
        let table = QuantizationTable::new([1; BLOCK_SIZE])?;
        let data = encode_gradient(&frame, &table, 0)?;
        let mut decoder = FrameDecoder::new(&frame)?;
        let result = decoder.decode_scan(
            &data,
            &gray_scan(),
            &quant_slots(table),
            &HuffmanTableSet::standard()?,
            1,
        );
        assert!(matches!(
            result,
            Err(Error::CorruptEntropyStream(Corruption::MissingRestart(0)))
        ));
        Ok(())
    }

    #[test]
    fn truncated_data() -> Result<()> {
        let frame = gray_frame(64, 64);
        let table = QuantizationTable::new([1; BLOCK_SIZE])?;
        let data = encode_gradient(&frame, &table, 0)?;
        let mut decoder = FrameDecoder::new(&frame)?;
        let result = decoder.decode_scan(
            &data[..data.len() / 2],
            &gray_scan(),
            &quant_slots(table),
            &HuffmanTableSet::standard()?,
            0,
        );
        assert!(matches!(result, Err(Error::CorruptEntropyStream(_))));
        Ok(())
    }
}
