// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    huffman::HUFFMAN_MAX_BITS,
    marker::MARKER_PREFIX,
    options::MagnitudeConvention,
};

/// Reads bits, most significant first, from entropy-coded scan data.
///
/// A 0xff byte in the data must be followed by a stuffed 0x00, which is
/// dropped. Bytes are fetched only when their first bit is needed, so a
/// marker right after the last coded bit is never touched.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    current: u8,
    bit_offset: u8,
    total_bits_read: usize,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], position: {}, current: {:08b}, bit_offset: {}, total_bits_read: {} }}",
            self.data.len(),
            self.position,
            self.current,
            self.bit_offset,
            self.total_bits_read,
        )
    }
}

impl<'a> BitReader<'a> {
    /// Constructs a BitReader for the scan data starting at `data[0]`.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            position: 0,
            current: 0,
            bit_offset: 0,
            total_bits_read: 0,
        }
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or(Error::UnexpectedEndOfStream)?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads a single bit.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0xff, 0x00, 0x3c]);
    /// assert_eq!(br.read(8)?, 0xff);
    /// assert_eq!(br.read_bit()?, 0);
    /// assert_eq!(br.read(7)?, 0x3c);
    /// assert_eq!(br.position(), 3);
    /// assert!(br.read_bit().is_err());
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.bit_offset == 0 {
            let byte = self.next_byte()?;
            if byte == MARKER_PREFIX {
                let stuffed = self.next_byte()?;
                if stuffed != 0 {
                    return Err(Error::InvalidByteStuffing(stuffed));
                }
            }
            self.current = byte;
        }
        let bit = (self.current >> (7 - self.bit_offset)) & 1;
        self.bit_offset = (self.bit_offset + 1) % 8;
        self.total_bits_read += 1;
        Ok(bit)
    }

    /// Reads `num` bits as an unsigned integer, first bit most significant.
    pub fn read(&mut self, num: usize) -> Result<u32> {
        debug_assert!(num <= 32);
        let mut value = 0u32;
        for _ in 0..num {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }

    /// Reads the `size` raw bits that follow a magnitude category and
    /// converts them to a signed coefficient.
    pub fn read_magnitude(&mut self, size: u8, convention: MagnitudeConvention) -> Result<i32> {
        if size as usize > HUFFMAN_MAX_BITS {
            return Err(Error::InvalidMagnitudeCategory(size));
        }
        let value = self.read(size as usize)?;
        Ok(convention.extend(value, size))
    }

    /// Returns the total number of bits that have been read.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }

    /// Number of bytes fetched so far, stuffing bytes included.
    pub fn position(&self) -> usize {
        self.position
    }
}
