// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Run-length and category coding of one quantized block.

use super::huffman::{HuffmanTable, HuffmanTableSet};
use super::optimize::optimal_spec;
use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::error::{Corruption, Error, Result};
use crate::headers::markers::TableClass;
use crate::{BLOCK_SIZE, MAX_COMPONENTS, MAX_TABLES};

const EOB: u8 = 0x00;
const ZRL: u8 = 0xF0;
const MAX_DC_CATEGORY: u8 = 11;

/// Number of bits needed for the magnitude of `value`.
pub fn category(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// The `category` low bits that encode `value`: the value itself when
/// positive, its one's complement when negative.
pub fn magnitude_bits(value: i32, category: u8) -> u32 {
    let bits = if value < 0 { value - 1 } else { value };
    (bits as u32) & ((1u32 << category) - 1)
}

/// Inverse of [`magnitude_bits`].
pub fn extend(bits: u32, category: u8) -> i32 {
    if category == 0 {
        return 0;
    }
    if bits < 1 << (category - 1) {
        bits as i32 - (1 << category) + 1
    } else {
        bits as i32
    }
}

/// Last DC value per frame component. Reset at the start of every scan and
/// after every restart marker.
#[derive(Debug, Default, Clone)]
pub struct DcPredictors {
    last: [i32; MAX_COMPONENTS],
}

impl DcPredictors {
    pub fn new() -> DcPredictors {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last = [0; MAX_COMPONENTS];
    }

    /// Records `dc` for `component` and returns its difference to the
    /// previous value.
    pub fn difference(&mut self, component: usize, dc: i16) -> i32 {
        let diff = dc as i32 - self.last[component];
        self.last[component] = dc as i32;
        diff
    }

    /// Applies a decoded difference and returns the new DC value.
    pub fn accumulate(&mut self, component: usize, diff: i32) -> i32 {
        self.last[component] = self.last[component].wrapping_add(diff);
        self.last[component]
    }
}

/// Receives the symbols of the entropy-coded blocks.
pub trait SymbolSink {
    /// Emits `symbol` from table `table` of `class`, followed by the low
    /// `extra_len` bits of `extra`.
    fn emit(&mut self, class: TableClass, table: u8, symbol: u8, extra: u32, extra_len: u8)
    -> Result<()>;

    /// Called between restart intervals.
    fn restart(&mut self, _index: usize) {}
}

/// Writes Huffman codes to a [`BitWriter`].
#[derive(Debug)]
pub struct HuffmanEncoder<'a> {
    writer: BitWriter,
    tables: &'a HuffmanTableSet,
}

impl<'a> HuffmanEncoder<'a> {
    pub fn new(tables: &'a HuffmanTableSet, writer: BitWriter) -> HuffmanEncoder<'a> {
        HuffmanEncoder { writer, tables }
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}

impl SymbolSink for HuffmanEncoder<'_> {
    fn emit(
        &mut self,
        class: TableClass,
        table: u8,
        symbol: u8,
        extra: u32,
        extra_len: u8,
    ) -> Result<()> {
        let (code, len) = self.tables.get(class, table)?.code(symbol)?;
        self.writer.write(code as u32, len);
        self.writer.write(extra, extra_len as usize);
        Ok(())
    }

    fn restart(&mut self, index: usize) {
        self.writer.write_restart_marker(index);
    }
}

/// Counts symbol frequencies per table.
#[derive(Debug, Clone)]
pub struct SymbolCounter {
    dc: [[u64; 256]; MAX_TABLES],
    ac: [[u64; 256]; MAX_TABLES],
}

impl Default for SymbolCounter {
    fn default() -> Self {
        SymbolCounter {
            dc: [[0; 256]; MAX_TABLES],
            ac: [[0; 256]; MAX_TABLES],
        }
    }
}

impl SymbolCounter {
    pub fn new() -> SymbolCounter {
        Self::default()
    }

    pub fn frequencies(&self, class: TableClass, table: u8) -> &[u64; 256] {
        match class {
            TableClass::Dc => &self.dc[table as usize],
            TableClass::Ac => &self.ac[table as usize],
        }
    }

    /// Optimal tables for every slot that saw at least one symbol.
    pub fn optimal_tables(&self) -> Result<HuffmanTableSet> {
        let mut set = HuffmanTableSet::new();
        for class in [TableClass::Dc, TableClass::Ac] {
            for id in 0..MAX_TABLES as u8 {
                let freqs = self.frequencies(class, id);
                if freqs.iter().any(|&f| f > 0) {
                    set.set(class, id, HuffmanTable::new(&optimal_spec(freqs))?)?;
                }
            }
        }
        Ok(set)
    }
}

impl SymbolSink for SymbolCounter {
    fn emit(&mut self, class: TableClass, table: u8, symbol: u8, _: u32, _: u8) -> Result<()> {
        let slots = match class {
            TableClass::Dc => &mut self.dc,
            TableClass::Ac => &mut self.ac,
        };
        let freqs = slots
            .get_mut(table as usize)
            .ok_or(Error::InvalidTableId(table))?;
        freqs[symbol as usize] += 1;
        Ok(())
    }
}

/// Emits one block of quantized levels in zig-zag order. `dc_diff` is the
/// difference of the DC level to the component's predictor.
pub fn encode_block(
    sink: &mut impl SymbolSink,
    levels: &[i16; BLOCK_SIZE],
    dc_diff: i32,
    dc_table: u8,
    ac_table: u8,
) -> Result<()> {
    let cat = category(dc_diff);
    sink.emit(
        TableClass::Dc,
        dc_table,
        cat,
        magnitude_bits(dc_diff, cat),
        cat,
    )?;
    let mut run = 0u8;
    for &level in &levels[1..] {
        if level == 0 {
            run += 1;
            continue;
        }
        while run >= 16 {
            sink.emit(TableClass::Ac, ac_table, ZRL, 0, 0)?;
            run -= 16;
        }
        let value = level as i32;
        let cat = category(value);
        sink.emit(
            TableClass::Ac,
            ac_table,
            (run << 4) | cat,
            magnitude_bits(value, cat),
            cat,
        )?;
        run = 0;
    }
    if run > 0 {
        sink.emit(TableClass::Ac, ac_table, EOB, 0, 0)?;
    }
    Ok(())
}

/// Reads one block into `levels` (zig-zag order), updating the DC
/// predictor of `component`.
pub fn decode_block(
    br: &mut BitReader,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    predictors: &mut DcPredictors,
    component: usize,
    levels: &mut [i16; BLOCK_SIZE],
) -> Result<()> {
    *levels = [0; BLOCK_SIZE];
    let cat = dc_table.decode(br)?;
    if cat > MAX_DC_CATEGORY {
        return Err(Error::CorruptEntropyStream(Corruption::DcCategory(cat)));
    }
    let diff = extend(br.read(cat as usize)?, cat);
    let dc = predictors.accumulate(component, diff);
    levels[0] = dc.clamp(i16::MIN as i32, i16::MAX as i32) as i16;

    let mut k = 1;
    while k < BLOCK_SIZE {
        let rs = ac_table.decode(br)?;
        let (run, size) = ((rs >> 4) as usize, rs & 0xF);
        if size == 0 {
            if run != 15 {
                // EOB
                break;
            }
            k += 16;
            if k > BLOCK_SIZE {
                return Err(Error::CorruptEntropyStream(Corruption::AcOverrun(k)));
            }
            continue;
        }
        k += run;
        if k >= BLOCK_SIZE {
            return Err(Error::CorruptEntropyStream(Corruption::AcOverrun(k)));
        }
        levels[k] = extend(br.read(size as usize)?, size) as i16;
        k += 1;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(TableClass, u8, u32, u8)>);

    impl SymbolSink for Recorder {
        fn emit(&mut self, class: TableClass, _: u8, symbol: u8, extra: u32, len: u8) -> Result<()> {
            self.0.push((class, symbol, extra, len));
            Ok(())
        }
    }

    #[test]
    fn categories() {
        assert_eq!(category(0), 0);
        assert_eq!(category(1), 1);
        assert_eq!(category(-1), 1);
        assert_eq!(category(-3), 2);
        assert_eq!(category(255), 8);
        assert_eq!(category(2047), 11);
        assert_eq!(magnitude_bits(-3, 2), 0b00);
        assert_eq!(magnitude_bits(3, 2), 0b11);
        assert_eq!(magnitude_bits(-1, 1), 0);
        for v in -2047..=2047 {
            let c = category(v);
            assert_eq!(extend(magnitude_bits(v, c), c), v);
        }
    }

    #[test]
    fn zero_ac_is_single_eob() -> Result<()> {
        let mut levels = [0; BLOCK_SIZE];
        levels[0] = 5;
        let mut rec = Recorder::default();
        encode_block(&mut rec, &levels, 5, 0, 0)?;
        assert_eq!(
            rec.0,
            [(TableClass::Dc, 3, 0b101, 3), (TableClass::Ac, EOB, 0, 0)]
        );
        Ok(())
    }

    #[test]
    fn runs_and_zrl() -> Result<()> {
        let mut levels = [0; BLOCK_SIZE];
        levels[2] = -2;
        levels[40] = 1;
        levels[BLOCK_SIZE - 1] = 3;
        let mut rec = Recorder::default();
        encode_block(&mut rec, &levels, 0, 0, 0)?;
        assert_eq!(
            rec.0,
            [
                (TableClass::Dc, 0, 0, 0),
                (TableClass::Ac, 0x12, 0b01, 2),
                // 37 zeros: two ZRL, then a run of 5.
                (TableClass::Ac, ZRL, 0, 0),
                (TableClass::Ac, ZRL, 0, 0),
                (TableClass::Ac, 0x51, 1, 1),
                (TableClass::Ac, ZRL, 0, 0),
                (TableClass::Ac, 0x62, 0b11, 2),
            ]
        );
        Ok(())
    }

    #[test]
    fn decodes_encoded_blocks() -> Result<()> {
        use rand::{Rng, SeedableRng};
        let tables = HuffmanTableSet::standard()?;
        let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(3);
        let blocks: Vec<[i16; BLOCK_SIZE]> = (0..50)
            .map(|_| {
                std::array::from_fn(|k| match k {
                    0 => rng.random_range(-1024..=1023),
                    _ if rng.random_range(0..4) == 0 => rng.random_range(-1023..=1023),
                    _ => 0,
                })
            })
            .collect();

        let mut predictors = DcPredictors::new();
        let mut encoder = HuffmanEncoder::new(&tables, BitWriter::new());
        for block in &blocks {
            let diff = predictors.difference(0, block[0]);
            encode_block(&mut encoder, block, diff, 1, 1)?;
        }
        let data = encoder.finish();

        let mut br = BitReader::new(&data);
        let mut predictors = DcPredictors::new();
        let dc = tables.get(TableClass::Dc, 1)?;
        let ac = tables.get(TableClass::Ac, 1)?;
        let mut levels = [0; BLOCK_SIZE];
        for block in &blocks {
            decode_block(&mut br, dc, ac, &mut predictors, 0, &mut levels)?;
            assert_eq!(&levels, block);
        }
        Ok(())
    }

    #[test]
    fn ac_overrun() -> Result<()> {
        let tables = HuffmanTableSet::standard()?;
        let mut w = HuffmanEncoder::new(&tables, BitWriter::new());
        w.emit(TableClass::Dc, 0, 0, 0, 0)?;
        for _ in 0..3 {
            w.emit(TableClass::Ac, 0, ZRL, 0, 0)?;
        }
        // 49 + 15 = 64
        w.emit(TableClass::Ac, 0, 0xF1, 1, 1)?;
        let data = w.finish();
        let mut levels = [0; BLOCK_SIZE];
        let result = decode_block(
            &mut BitReader::new(&data),
            tables.get(TableClass::Dc, 0)?,
            tables.get(TableClass::Ac, 0)?,
            &mut DcPredictors::new(),
            0,
            &mut levels,
        );
        assert!(matches!(
            result,
            Err(Error::CorruptEntropyStream(Corruption::AcOverrun(64)))
        ));
        Ok(())
    }

    #[test]
    fn counter_builds_tables() -> Result<()> {
        let mut counter = SymbolCounter::new();
        let mut levels = [0; BLOCK_SIZE];
        levels[1] = 7;
        encode_block(&mut counter, &levels, -4, 0, 1)?;
        encode_block(&mut counter, &levels, 0, 0, 1)?;
        assert_eq!(counter.frequencies(TableClass::Dc, 0)[3], 1);
        assert_eq!(counter.frequencies(TableClass::Dc, 0)[0], 1);
        assert_eq!(counter.frequencies(TableClass::Ac, 1)[0x03], 2);
        assert_eq!(counter.frequencies(TableClass::Ac, 1)[EOB as usize], 2);
        let tables = counter.optimal_tables()?;
        assert!(tables.contains(TableClass::Dc, 0));
        assert!(tables.contains(TableClass::Ac, 1));
        assert!(!tables.contains(TableClass::Ac, 0));
        Ok(())
    }
}
