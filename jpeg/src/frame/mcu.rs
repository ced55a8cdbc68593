// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_DIM;
use crate::headers::FrameHeader;

/// Geometry of one component within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentLayout {
    pub h: usize,
    pub v: usize,
    /// Sample dimensions, `ceil(width * h / h_max)` by `ceil(height * v / v_max)`.
    pub width: usize,
    pub height: usize,
    /// Block grid covering whole MCUs.
    pub blocks_x: usize,
    pub blocks_y: usize,
}

impl ComponentLayout {
    /// Block grid coded by a scan containing only this component.
    pub fn coded_blocks(&self) -> (usize, usize) {
        (
            self.width.div_ceil(BLOCK_DIM),
            self.height.div_ceil(BLOCK_DIM),
        )
    }

    /// Ratio of the full image size to this component's size.
    pub fn upsampling(&self, h_max: usize, v_max: usize) -> (usize, usize) {
        (h_max / self.h, v_max / self.v)
    }
}

/// A block visited by a scan: the index of its component within the scan
/// and its position in the component's block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPos {
    pub scan_component: usize,
    pub bx: usize,
    pub by: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: usize,
    pub height: usize,
    pub h_max: usize,
    pub v_max: usize,
    pub mcus_x: usize,
    pub mcus_y: usize,
    pub components: Vec<ComponentLayout>,
}

impl FrameLayout {
    pub fn new(frame: &FrameHeader) -> FrameLayout {
        let width = frame.width as usize;
        let height = frame.height as usize;
        let (h_max, v_max) = frame.max_sampling();
        let (h_max, v_max) = (h_max as usize, v_max as usize);
        let mcus_x = width.div_ceil(BLOCK_DIM * h_max);
        let mcus_y = height.div_ceil(BLOCK_DIM * v_max);
        let components = frame
            .components
            .iter()
            .map(|c| {
                let (h, v) = (c.h as usize, c.v as usize);
                ComponentLayout {
                    h,
                    v,
                    width: (width * h).div_ceil(h_max),
                    height: (height * v).div_ceil(v_max),
                    blocks_x: mcus_x * h,
                    blocks_y: mcus_y * v,
                }
            })
            .collect();
        FrameLayout {
            width,
            height,
            h_max,
            v_max,
            mcus_x,
            mcus_y,
            components,
        }
    }

    /// Number of MCUs of a scan over `scan_components` (frame component
    /// indices). A single-component scan is not interleaved and its MCU is
    /// one block.
    pub fn mcu_count(&self, scan_components: &[usize]) -> usize {
        match scan_components {
            [c] => {
                let (bx, by) = self.components[*c].coded_blocks();
                bx * by
            }
            _ => self.mcus_x * self.mcus_y,
        }
    }

    /// Replaces `out` with the blocks of MCU `mcu`, in coding order.
    pub fn mcu_blocks(&self, scan_components: &[usize], mcu: usize, out: &mut Vec<BlockPos>) {
        out.clear();
        if let [c] = scan_components {
            let (blocks_x, _) = self.components[*c].coded_blocks();
            out.push(BlockPos {
                scan_component: 0,
                bx: mcu % blocks_x,
                by: mcu / blocks_x,
            });
            return;
        }
        let (mx, my) = (mcu % self.mcus_x, mcu / self.mcus_x);
        for (scan_component, &c) in scan_components.iter().enumerate() {
            let comp = &self.components[c];
            for y in 0..comp.v {
                for x in 0..comp.h {
                    out.push(BlockPos {
                        scan_component,
                        bx: mx * comp.h + x,
                        by: my * comp.v + y,
                    });
                }
            }
        }
    }
}
