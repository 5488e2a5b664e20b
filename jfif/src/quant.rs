// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};

use crate::{
    BLOCK_SIZE, NUM_TABLE_SLOTS,
    byte_cursor::ByteCursor,
    error::{Error, Result},
    marker::Marker,
    util::tracing_wrappers::*,
};

/// JPEG quantization table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    /// Precision (0 = 8-bit, anything else = 16-bit)
    pub precision: u8,
    /// Table slot (0-3)
    pub id: u8,
    /// Quantization values (64 entries in zigzag order)
    pub values: [u16; BLOCK_SIZE],
}

impl QuantizationTable {
    /// Reads one table definition from a DQT payload.
    pub fn read(segment: &mut ByteCursor) -> Result<QuantizationTable> {
        let (precision, id) = segment.read_nibbles()?;
        if id as usize >= NUM_TABLE_SLOTS {
            return Err(Error::InvalidTableId(id));
        }
        let entry_size = if precision == 0 { 1 } else { 2 };
        let available = segment.remaining().len();
        if available < BLOCK_SIZE * entry_size {
            return Err(Error::InvalidSegmentLength(Marker::Dqt.code(), available));
        }
        let raw = segment.take(BLOCK_SIZE * entry_size)?;
        let mut values = [0u16; BLOCK_SIZE];
        if entry_size == 1 {
            for (value, &byte) in values.iter_mut().zip(raw) {
                *value = byte as u16;
            }
        } else {
            BigEndian::read_u16_into(raw, &mut values);
        }
        Ok(QuantizationTable {
            precision,
            id,
            values,
        })
    }
}

/// Quantization tables by slot, as defined so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantizationTables {
    tables: [Option<QuantizationTable>; NUM_TABLE_SLOTS],
}

impl QuantizationTables {
    /// Parses a DQT payload. The payload may hold several tables; each one
    /// overwrites the slot it names.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
    pub fn read_segment(&mut self, segment: &mut ByteCursor) -> Result<()> {
        if segment.is_empty() {
            return Err(Error::InvalidSegmentLength(Marker::Dqt.code(), 0));
        }
        while !segment.is_empty() {
            let table = QuantizationTable::read(segment)?;
            debug!(id = table.id, precision = table.precision, "quantization table");
            let slot = table.id as usize;
            self.tables[slot] = Some(table);
        }
        Ok(())
    }

    pub fn get(&self, id: u8) -> Option<&QuantizationTable> {
        self.tables.get(id as usize).and_then(Option::as_ref)
    }

    /// Defined tables in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &QuantizationTable> {
        self.tables.iter().flatten()
    }
}
