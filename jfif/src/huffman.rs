// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Canonical Huffman tables from DHT segments (ITU-T T.81 Annex C) and the
//! bit-by-bit code lookup used by the scan decoder.

use std::fmt;

use crate::{
    NUM_TABLE_SLOTS,
    bit_reader::BitReader,
    byte_cursor::ByteCursor,
    error::{Error, Result},
    marker::Marker,
    util::tracing_wrappers::*,
};

pub const HUFFMAN_MAX_BITS: usize = 16;

/// Table class (Tc) of a DHT table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuffmanClass {
    Dc,
    Ac,
}

impl TryFrom<u8> for HuffmanClass {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(HuffmanClass::Dc),
            1 => Ok(HuffmanClass::Ac),
            _ => Err(Error::InvalidTableClass(value)),
        }
    }
}

/// AC symbol: number of zero coefficients preceding the next one, and the
/// magnitude category of that coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcSymbol {
    pub run: u8,
    pub size: u8,
}

impl AcSymbol {
    /// End of block: all remaining coefficients are zero.
    pub const EOB: AcSymbol = AcSymbol { run: 0, size: 0 };
    /// Zero run length: sixteen zero coefficients.
    pub const ZRL: AcSymbol = AcSymbol { run: 15, size: 0 };
}

impl From<u8> for AcSymbol {
    fn from(byte: u8) -> Self {
        AcSymbol {
            run: byte >> 4,
            size: byte & 0xf,
        }
    }
}

/// A code word of `len` bits; `bits` holds it right-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HuffmanCode {
    pub len: u8,
    pub bits: u16,
}

impl fmt::Display for HuffmanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.len as usize)
    }
}

/// Assigns canonical codes for a histogram of code lengths: `counts[i]` codes
/// of length `i + 1`, consecutive within a length, shifting left one bit
/// when moving to the next length.
/// ```
/// # use jfif::huffman::canonical_codes;
/// let mut counts = [0u8; 16];
/// counts[1] = 2;
/// counts[2] = 1;
/// let codes: Vec<String> = canonical_codes(&counts)?.iter().map(|c| c.to_string()).collect();
/// assert_eq!(codes, ["00", "01", "100"]);
/// # Ok::<(), jfif::error::Error>(())
/// ```
pub fn canonical_codes(counts: &[u8; HUFFMAN_MAX_BITS]) -> Result<Vec<HuffmanCode>> {
    let mut codes = Vec::with_capacity(counts.iter().map(|&c| c as usize).sum());
    let mut code = 0u32;
    for (i, &count) in counts.iter().enumerate() {
        let len = i + 1;
        for _ in 0..count {
            if code >= 1 << len {
                return Err(Error::InvalidHuffmanTable(len));
            }
            codes.push(HuffmanCode {
                len: len as u8,
                bits: code as u16,
            });
            code += 1;
        }
        code <<= 1;
    }
    Ok(codes)
}

/// Codes of one length occupy a contiguous range of values and of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CodeRange {
    first_code: u32,
    first_index: usize,
    count: u32,
}

/// Canonical Huffman table mapping codes to symbols of type `S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable<S> {
    entries: Vec<(HuffmanCode, S)>,
    ranges: [CodeRange; HUFFMAN_MAX_BITS + 1],
}

pub type DcTable = HuffmanTable<u8>;
pub type AcTable = HuffmanTable<AcSymbol>;

impl<S: Copy> HuffmanTable<S> {
    /// Builds a table from the code length histogram and the symbols in code
    /// order.
    pub fn new(counts: &[u8; HUFFMAN_MAX_BITS], symbols: &[S]) -> Result<HuffmanTable<S>> {
        let codes = canonical_codes(counts)?;
        if codes.len() != symbols.len() {
            return Err(Error::SymbolCountMismatch {
                expected: codes.len(),
                available: symbols.len(),
            });
        }
        let mut ranges = [CodeRange::default(); HUFFMAN_MAX_BITS + 1];
        let mut index = 0;
        for (i, &count) in counts.iter().enumerate() {
            if count > 0 {
                ranges[i + 1] = CodeRange {
                    first_code: codes[index].bits as u32,
                    first_index: index,
                    count: count as u32,
                };
            }
            index += count as usize;
        }
        let entries = codes.into_iter().zip(symbols.iter().copied()).collect();
        Ok(HuffmanTable { entries, ranges })
    }

    fn lookup(&self, len: usize, code: u32) -> Option<S> {
        let range = &self.ranges[len];
        let offset = code.checked_sub(range.first_code)?;
        (offset < range.count).then(|| self.entries[range.first_index + offset as usize].1)
    }

    /// Symbol for `code`, if the table has that code.
    pub fn get(&self, code: HuffmanCode) -> Option<S> {
        if code.len == 0 || code.len as usize > HUFFMAN_MAX_BITS {
            return None;
        }
        self.lookup(code.len as usize, code.bits as u32)
    }

    /// All codes with their symbols, in canonical order.
    pub fn entries(&self) -> &[(HuffmanCode, S)] {
        &self.entries
    }

    /// Reads bits until they form a code of this table and returns its
    /// symbol. Consumes exactly the bits of that code.
    pub fn decode(&self, br: &mut BitReader) -> Result<S> {
        let mut code = 0u32;
        for len in 1..=HUFFMAN_MAX_BITS {
            code = (code << 1) | br.read_bit()? as u32;
            if let Some(symbol) = self.lookup(len, code) {
                return Ok(symbol);
            }
        }
        Err(Error::HuffmanDecodeOverflow)
    }
}

/// DC and AC tables by slot, as defined so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTables {
    dc: [Option<DcTable>; NUM_TABLE_SLOTS],
    ac: [Option<AcTable>; NUM_TABLE_SLOTS],
}

impl HuffmanTables {
    /// Parses a DHT payload. The payload may hold several tables; each one
    /// overwrites the slot it names.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
    pub fn read_segment(&mut self, segment: &mut ByteCursor) -> Result<()> {
        if segment.is_empty() {
            return Err(Error::InvalidSegmentLength(Marker::Dht.code(), 0));
        }
        while !segment.is_empty() {
            let (class, id) = segment.read_nibbles()?;
            let class = HuffmanClass::try_from(class)?;
            if id as usize >= NUM_TABLE_SLOTS {
                return Err(Error::InvalidTableId(id));
            }
            let available = segment.remaining().len();
            if available < HUFFMAN_MAX_BITS {
                return Err(Error::InvalidSegmentLength(Marker::Dht.code(), available));
            }
            let mut counts = [0u8; HUFFMAN_MAX_BITS];
            counts.copy_from_slice(segment.take(HUFFMAN_MAX_BITS)?);
            let num_symbols: usize = counts.iter().map(|&c| c as usize).sum();

            let available = segment.remaining().len();
            // Leftovers too short to start another table belong to this one.
            let trailing = available.checked_sub(num_symbols);
            if trailing.is_none_or(|t| t > 0 && t <= HUFFMAN_MAX_BITS) {
                return Err(Error::SymbolCountMismatch {
                    expected: num_symbols,
                    available,
                });
            }
            let symbols = segment.take(num_symbols)?;
            debug!(?class, id, num_symbols, "huffman table");
            let slot = id as usize;
            match class {
                HuffmanClass::Dc => {
                    self.dc[slot] = Some(HuffmanTable::new(&counts, symbols)?);
                }
                HuffmanClass::Ac => {
                    let symbols: Vec<AcSymbol> = symbols.iter().map(|&s| s.into()).collect();
                    self.ac[slot] = Some(HuffmanTable::new(&counts, &symbols)?);
                }
            }
        }
        Ok(())
    }

    pub fn dc(&self, id: u8) -> Option<&DcTable> {
        self.dc.get(id as usize).and_then(Option::as_ref)
    }

    pub fn ac(&self, id: u8) -> Option<&AcTable> {
        self.ac.get(id as usize).and_then(Option::as_ref)
    }

    /// Defined tables as (class, slot) pairs.
    pub fn defined(&self) -> impl Iterator<Item = (HuffmanClass, u8)> + '_ {
        let dc = (0..NUM_TABLE_SLOTS as u8).filter(move |&id| self.dc(id).is_some());
        let ac = (0..NUM_TABLE_SLOTS as u8).filter(move |&id| self.ac(id).is_some());
        dc.map(|id| (HuffmanClass::Dc, id))
            .chain(ac.map(|id| (HuffmanClass::Ac, id)))
    }
}
