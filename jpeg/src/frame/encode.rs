// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::mcu::{ComponentLayout, FrameLayout};
use super::quantizer::QuantizationTable;
use crate::entropy_coding::block::{DcPredictors, SymbolSink, encode_block};
use crate::error::Result;
use crate::headers::ScanHeader;
use crate::image::Plane;
use crate::util::tracing_wrappers::*;
use crate::var_dct::dct::forward_dct_8x8;
use crate::{BLOCK_DIM, BLOCK_SIZE};

/// Quantized levels (zig-zag order) for every block of a component's
/// grid, row by row.
#[derive(Debug, Clone)]
pub struct QuantizedComponent {
    pub blocks_x: usize,
    pub blocks: Vec<[i16; BLOCK_SIZE]>,
}

impl QuantizedComponent {
    pub fn block(&self, bx: usize, by: usize) -> &[i16; BLOCK_SIZE] {
        &self.blocks[by * self.blocks_x + bx]
    }
}

/// Transforms and quantizes `plane`, sized as `layout`, over the whole
/// block grid. Samples past the plane edge repeat the last row or column.
pub fn quantize_component(
    plane: &Plane<f32>,
    layout: &ComponentLayout,
    table: &QuantizationTable,
) -> Result<QuantizedComponent> {
    let num_blocks = layout.blocks_x * layout.blocks_y;
    let mut blocks = Vec::new();
    blocks.try_reserve_exact(num_blocks)?;
    let mut samples = [0.0f32; BLOCK_SIZE];
    for by in 0..layout.blocks_y {
        for bx in 0..layout.blocks_x {
            for (i, s) in samples.iter_mut().enumerate() {
                let x = bx * BLOCK_DIM + i % BLOCK_DIM;
                let y = by * BLOCK_DIM + i / BLOCK_DIM;
                *s = plane.get_clamped(x, y) - 128.0;
            }
            forward_dct_8x8(&mut samples);
            let mut levels = [0i16; BLOCK_SIZE];
            table.quantize_block(&samples, &mut levels);
            blocks.push(levels);
        }
    }
    Ok(QuantizedComponent {
        blocks_x: layout.blocks_x,
        blocks,
    })
}

/// Feeds the symbols of one scan into `sink`, emitting a restart every
/// `restart_interval` MCUs (never if zero).
pub fn encode_scan(
    sink: &mut impl SymbolSink,
    layout: &FrameLayout,
    scan: &ScanHeader,
    components: &[QuantizedComponent],
    restart_interval: usize,
) -> Result<()> {
    let scan_components: Vec<usize> = scan.components.iter().map(|c| c.component_index).collect();
    let mcu_count = layout.mcu_count(&scan_components);
    debug!(?scan_components, mcu_count, restart_interval, "encoding scan");
    let mut predictors = DcPredictors::new();
    let mut blocks = Vec::new();
    for mcu in 0..mcu_count {
        if restart_interval > 0 && mcu > 0 && mcu % restart_interval == 0 {
            sink.restart(mcu / restart_interval - 1);
            predictors.reset();
        }
        layout.mcu_blocks(&scan_components, mcu, &mut blocks);
        for pos in &blocks {
            let sc = &scan.components[pos.scan_component];
            let levels = components[sc.component_index].block(pos.bx, pos.by);
            let diff = predictors.difference(sc.component_index, levels[0]);
            encode_block(sink, levels, diff, sc.dc_table, sc.ac_table)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::entropy_coding::block::SymbolCounter;
    use crate::headers::markers::TableClass;
    use crate::headers::{ComponentSpec, FrameHeader, ScanComponent};

    #[test]
    fn flat_plane_has_dc_only() -> Result<()> {
        let header = FrameHeader::baseline(
            10,
            10,
            vec![ComponentSpec {
                id: 1,
                h: 1,
                v: 1,
                quant_table: 0,
            }],
        );
        let layout = FrameLayout::new(&header);
        let mut plane = Plane::new((10, 10))?;
        for y in 0..10 {
            plane.row_mut(y).fill(200.0);
        }
        let table = QuantizationTable::new([4; BLOCK_SIZE])?;
        let quantized = quantize_component(&plane, &layout.components[0], &table)?;
        assert_eq!(quantized.blocks.len(), 4);
        for block in &quantized.blocks {
            // 8 * (200 - 128) / 4
            assert_eq!(block[0], 144);
            assert!(block[1..].iter().all(|&l| l == 0));
        }

        let scan = ScanHeader::sequential(vec![ScanComponent {
            component_index: 0,
            dc_table: 0,
            ac_table: 0,
        }]);
        let mut counter = SymbolCounter::new();
        encode_scan(&mut counter, &layout, &scan, &[quantized], 0)?;
        let dc = counter.frequencies(TableClass::Dc, 0);
        // One nonzero DC difference, then three zero differences.
        assert_eq!(dc[8], 1);
        assert_eq!(dc[0], 3);
        assert_eq!(counter.frequencies(TableClass::Ac, 0)[0], 4);
        Ok(())
    }

    #[derive(Default)]
    struct RestartLog(Vec<usize>, usize);

    impl SymbolSink for RestartLog {
        fn emit(&mut self, class: TableClass, _: u8, symbol: u8, _: u32, _: u8) -> Result<()> {
            if class == TableClass::Dc && symbol != 0 {
                self.1 += 1;
            }
            Ok(())
        }

        fn restart(&mut self, index: usize) {
            self.0.push(index);
        }
    }

    #[test]
    fn restarts_reset_predictors() -> Result<()> {
        let header = FrameHeader::baseline(
            40,
            8,
            vec![ComponentSpec {
                id: 1,
                h: 1,
                v: 1,
                quant_table: 0,
            }],
        );
        let layout = FrameLayout::new(&header);
        let component = QuantizedComponent {
            blocks_x: 5,
            blocks: vec![[3; BLOCK_SIZE]; 5],
        };
        let scan = ScanHeader::sequential(vec![ScanComponent {
            component_index: 0,
            dc_table: 0,
            ac_table: 0,
        }]);
        let mut log = RestartLog::default();
        encode_scan(&mut log, &layout, &scan, &[component], 2)?;
        assert_eq!(log.0, [0, 1]);
        // Nonzero DC differences start each interval.
        assert_eq!(log.1, 3);
        Ok(())
    }
}
