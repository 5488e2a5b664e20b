// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Reads bytes from the marker segment part of a JPEG stream.
#[derive(Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ByteCursor{{ position: {}, remaining: [{} bytes] }}",
            self.position,
            self.data.len()
        )
    }
}

impl<'a> ByteCursor<'a> {
    /// Constructs a ByteCursor positioned at the first byte of `data`.
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, position: 0 }
    }

    /// Consumes exactly `num` bytes.
    /// ```
    /// # use jfif::byte_cursor::ByteCursor;
    /// let mut cursor = ByteCursor::new(&[1, 2, 3]);
    /// assert_eq!(cursor.take(2)?, &[1, 2]);
    /// assert_eq!(cursor.position(), 2);
    /// assert!(cursor.take(2).is_err());
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn take(&mut self, num: usize) -> Result<&'a [u8]> {
        if num > self.data.len() {
            return Err(Error::UnexpectedEndOfStream);
        }
        let (head, tail) = self.data.split_at(num);
        self.data = tail;
        self.position += num;
        Ok(head)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a big-endian 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Reads one byte and splits it into its high and low nibble.
    pub fn read_nibbles(&mut self) -> Result<(u8, u8)> {
        let byte = self.read_u8()?;
        Ok((byte >> 4, byte & 0xf))
    }

    /// Consumes bytes up to, but not including, the next occurrence of `byte`.
    /// Consumes everything if `byte` does not occur.
    pub fn skip_until(&mut self, byte: u8) -> &'a [u8] {
        let len = self
            .data
            .iter()
            .position(|&b| b == byte)
            .unwrap_or(self.data.len());
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        self.position += len;
        head
    }

    /// Reads a segment length field and splits off a cursor over the
    /// `length - 2` payload bytes that follow it. `self` is advanced past the
    /// whole segment.
    pub fn split_segment(&mut self, marker: u8) -> Result<ByteCursor<'a>> {
        let length = self.read_u16()? as usize;
        if length < 2 {
            return Err(Error::InvalidSegmentLength(marker, length));
        }
        let position = self.position;
        let data = self.take(length - 2)?;
        Ok(ByteCursor { data, position })
    }

    /// Next byte, without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute offset of the next byte in the original buffer.
    pub fn position(&self) -> usize {
        self.position
    }
}
