// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    bit_reader::BitReader,
    error::{Error, Result},
    frame::FrameHeader,
    huffman::{AcSymbol, AcTable, DcTable, HuffmanClass, HuffmanTables},
    options::MagnitudeConvention,
    quant::QuantizationTables,
};

/// Quantized coefficients of one 8x8 block, in zig-zag order.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    pub coefficients: [i32; BLOCK_SIZE],
}

impl Block {
    pub fn dc(&self) -> i32 {
        self.coefficients[0]
    }

    pub fn ac(&self) -> &[i32] {
        &self.coefficients[1..]
    }
}

impl Default for Block {
    fn default() -> Self {
        Block {
            coefficients: [0; BLOCK_SIZE],
        }
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Trailing zeros are noise in dumps.
        let len = self
            .coefficients
            .iter()
            .rposition(|&c| c != 0)
            .map_or(1, |i| i + 1);
        write!(f, "Block{:?}", &self.coefficients[..len])
    }
}

/// Blocks of one MCU, one per MCU structure entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mcu {
    pub blocks: Vec<Block>,
}

/// Number of MCUs per row and per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuGrid {
    pub columns: usize,
    pub rows: usize,
}

impl McuGrid {
    pub fn count(&self) -> usize {
        self.columns * self.rows
    }
}

/// Component id of each block in an MCU: components in ascending id order,
/// each repeated once per sampling unit.
pub fn mcu_structure(frame: &FrameHeader) -> Vec<u8> {
    frame
        .components
        .values()
        .flat_map(|c| std::iter::repeat_n(c.id, c.blocks_per_mcu()))
        .collect()
}

/// MCU grid covering the image at the largest sampling factors.
pub fn mcu_grid(frame: &FrameHeader) -> McuGrid {
    let (h_max, v_max) = frame.max_sampling();
    let blocks_x = (frame.image.width as usize).div_ceil(BLOCK_DIM);
    let blocks_y = (frame.image.height as usize).div_ceil(BLOCK_DIM);
    McuGrid {
        columns: blocks_x.div_ceil(h_max as usize),
        rows: blocks_y.div_ceil(v_max as usize),
    }
}

/// Huffman tables used for one MCU structure entry.
#[derive(Debug)]
struct BlockTables<'a> {
    dc: &'a DcTable,
    ac: &'a AcTable,
}

/// Decodes MCUs with the tables bound to each component.
#[derive(Debug)]
pub struct McuDecoder<'a> {
    tables: Vec<BlockTables<'a>>,
    convention: MagnitudeConvention,
}

impl<'a> McuDecoder<'a> {
    /// Resolves the tables of every block in the MCU structure. Fails if a
    /// component was not bound by the scan or a table it refers to was
    /// never defined.
    pub fn new(
        frame: &FrameHeader,
        huffman_tables: &'a HuffmanTables,
        quantization_tables: &QuantizationTables,
        convention: MagnitudeConvention,
    ) -> Result<McuDecoder<'a>> {
        let mut tables = Vec::new();
        for component in frame.components.values() {
            let (Some(dc_id), Some(ac_id)) = (component.dc_tbl_idx, component.ac_tbl_idx) else {
                return Err(Error::ComponentNotInScan(component.id));
            };
            let dc = huffman_tables
                .dc(dc_id)
                .ok_or(Error::MissingHuffmanTable(HuffmanClass::Dc, dc_id))?;
            let ac = huffman_tables
                .ac(ac_id)
                .ok_or(Error::MissingHuffmanTable(HuffmanClass::Ac, ac_id))?;
            if quantization_tables.get(component.quant_idx).is_none() {
                return Err(Error::MissingQuantizationTable(component.quant_idx));
            }
            for _ in 0..component.blocks_per_mcu() {
                tables.push(BlockTables { dc, ac });
            }
        }
        Ok(McuDecoder { tables, convention })
    }

    /// Number of blocks in each MCU.
    pub fn blocks_per_mcu(&self) -> usize {
        self.tables.len()
    }

    pub fn decode_mcu(&self, br: &mut BitReader) -> Result<Mcu> {
        let blocks = self
            .tables
            .iter()
            .map(|t| decode_block(&mut *br, t.dc, t.ac, self.convention))
            .collect::<Result<_>>()?;
        Ok(Mcu { blocks })
    }
}

/// Decodes the DC category and value, then (run, size) AC symbols until
/// end of block or 63 AC coefficients.
pub fn decode_block(
    br: &mut BitReader,
    dc: &DcTable,
    ac: &AcTable,
    convention: MagnitudeConvention,
) -> Result<Block> {
    let mut block = Block::default();
    let size = dc.decode(br)?;
    block.coefficients[0] = br.read_magnitude(size, convention)?;

    let mut k = 1;
    while k < BLOCK_SIZE {
        let symbol = ac.decode(br)?;
        if symbol == AcSymbol::EOB {
            break;
        }
        // A zero-size symbol emits its run plus the zero coefficient itself.
        let zeros = match symbol {
            AcSymbol::ZRL => 16,
            AcSymbol { run, size: 0 } => run as usize + 1,
            AcSymbol { run, .. } => run as usize,
        };
        let end = k + zeros + (symbol.size != 0) as usize;
        if end > BLOCK_SIZE {
            return Err(Error::CoefficientOverflow(end - 1));
        }
        k += zeros;
        if symbol.size != 0 {
            block.coefficients[k] = br.read_magnitude(symbol.size, convention)?;
            k += 1;
        }
    }
    Ok(block)
}
