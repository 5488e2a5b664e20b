// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::HashMap;

use crate::{
    BLOCK_SIZE,
    huffman::{HUFFMAN_MAX_BITS, HuffmanCode, canonical_codes},
    marker::{MARKER_PREFIX, Marker, SOI},
};

// Typical Huffman tables from ITU-T T.81 Annex K.3.
pub const STD_LUMA_DC_COUNTS: [u8; HUFFMAN_MAX_BITS] = [
    0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

pub const STD_LUMA_DC_VALUES: [u8; 12] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b,
];

pub const STD_LUMA_AC_COUNTS: [u8; HUFFMAN_MAX_BITS] = [
    0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05, 0x04, 0x04, 0x00, 0x00, 0x01, 0x7d,
];

pub const STD_LUMA_AC_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08, 0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// Writes bits most significant first, stuffing a zero byte after each 0xff.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    num_bits: u8,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter::default()
    }

    pub fn write_bit(&mut self, bit: u8) {
        self.current = (self.current << 1) | (bit & 1);
        self.num_bits += 1;
        if self.num_bits == 8 {
            self.bytes.push(self.current);
            if self.current == MARKER_PREFIX {
                self.bytes.push(0);
            }
            self.current = 0;
            self.num_bits = 0;
        }
    }

    pub fn write(&mut self, bits: u32, num: usize) {
        for i in (0..num).rev() {
            self.write_bit((bits >> i) as u8 & 1);
        }
    }

    pub fn write_code(&mut self, code: HuffmanCode) {
        self.write(code.bits as u32, code.len as usize);
    }

    /// Pads the last byte with one bits.
    pub fn finish(mut self) -> Vec<u8> {
        while self.num_bits != 0 {
            self.write_bit(1);
        }
        self.bytes
    }
}

pub struct HuffmanEncoder {
    codes: HashMap<u8, HuffmanCode>,
}

impl HuffmanEncoder {
    pub fn new(counts: &[u8; HUFFMAN_MAX_BITS], symbols: &[u8]) -> HuffmanEncoder {
        let codes = canonical_codes(counts).unwrap();
        HuffmanEncoder {
            codes: symbols.iter().copied().zip(codes).collect(),
        }
    }

    pub fn luma_dc() -> HuffmanEncoder {
        HuffmanEncoder::new(&STD_LUMA_DC_COUNTS, &STD_LUMA_DC_VALUES)
    }

    pub fn luma_ac() -> HuffmanEncoder {
        HuffmanEncoder::new(&STD_LUMA_AC_COUNTS, &STD_LUMA_AC_VALUES)
    }

    pub fn write(&self, writer: &mut BitWriter, symbol: u8) {
        writer.write_code(self.codes[&symbol]);
    }
}

/// Magnitude category and raw bits of `v`, standard convention.
pub fn magnitude_bits(v: i32) -> (u8, u32) {
    let size = (32 - v.unsigned_abs().leading_zeros()) as u8;
    let bits = if v < 0 { v + (1 << size) - 1 } else { v };
    (size, bits as u32)
}

/// Entropy-codes one block of coefficients in zig-zag order. The DC value is
/// written as is.
pub fn encode_block(
    writer: &mut BitWriter,
    block: &[i32; BLOCK_SIZE],
    dc: &HuffmanEncoder,
    ac: &HuffmanEncoder,
) {
    let (size, bits) = magnitude_bits(block[0]);
    dc.write(writer, size);
    writer.write(bits, size as usize);
    let mut run = 0u8;
    for &coefficient in &block[1..] {
        if coefficient == 0 {
            run += 1;
            continue;
        }
        while run > 15 {
            ac.write(writer, 0xf0);
            run -= 16;
        }
        let (size, bits) = magnitude_bits(coefficient);
        ac.write(writer, (run << 4) | size);
        writer.write(bits, size as usize);
        run = 0;
    }
    if run > 0 {
        ac.write(writer, 0x00);
    }
}

/// Entropy-codes blocks back to back with the typical luminance tables.
pub fn encode_blocks(blocks: &[[i32; BLOCK_SIZE]]) -> Vec<u8> {
    let (dc, ac) = (HuffmanEncoder::luma_dc(), HuffmanEncoder::luma_ac());
    let mut writer = BitWriter::new();
    for block in blocks {
        encode_block(&mut writer, block, &dc, &ac);
    }
    writer.finish()
}

pub fn dht_payload(class: u8, id: u8, counts: &[u8; HUFFMAN_MAX_BITS], symbols: &[u8]) -> Vec<u8> {
    let mut payload = vec![(class << 4) | id];
    payload.extend_from_slice(counts);
    payload.extend_from_slice(symbols);
    payload
}

/// Assembles synthetic baseline streams segment by segment.
pub struct JpegBuilder {
    data: Vec<u8>,
}

impl JpegBuilder {
    pub fn new() -> JpegBuilder {
        JpegBuilder { data: SOI.to_vec() }
    }

    pub fn segment(mut self, marker: u8, payload: &[u8]) -> JpegBuilder {
        self.data.extend([MARKER_PREFIX, marker]);
        self.data
            .extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
        self.data.extend_from_slice(payload);
        self
    }

    /// Appends bytes without any framing.
    pub fn raw(mut self, bytes: &[u8]) -> JpegBuilder {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn dqt(self, id: u8, value: u8) -> JpegBuilder {
        let mut payload = vec![id];
        payload.extend([value; BLOCK_SIZE]);
        self.segment(Marker::Dqt.code(), &payload)
    }

    /// `components` holds (id, sampling byte, quantization slot).
    pub fn sof0(self, width: u16, height: u16, components: &[(u8, u8, u8)]) -> JpegBuilder {
        let mut payload = vec![8];
        payload.extend(height.to_be_bytes());
        payload.extend(width.to_be_bytes());
        payload.push(components.len() as u8);
        for &(id, sampling, quant) in components {
            payload.extend([id, sampling, quant]);
        }
        self.segment(Marker::Sof0.code(), &payload)
    }

    /// Typical luminance tables in DC slot 0 and AC slot 0.
    pub fn luma_tables(self) -> JpegBuilder {
        let mut payload = dht_payload(0, 0, &STD_LUMA_DC_COUNTS, &STD_LUMA_DC_VALUES);
        payload.extend(dht_payload(1, 0, &STD_LUMA_AC_COUNTS, &STD_LUMA_AC_VALUES));
        self.segment(Marker::Dht.code(), &payload)
    }

    /// `components` holds (id, table selector byte).
    pub fn sos(self, components: &[(u8, u8)]) -> JpegBuilder {
        let mut payload = vec![components.len() as u8];
        for &(id, tables) in components {
            payload.extend([id, tables]);
        }
        payload.extend([0, 63, 0]);
        self.segment(Marker::Sos.code(), &payload)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Appends the entropy-coded data and EOI.
    pub fn finish(mut self, entropy_data: &[u8]) -> Vec<u8> {
        self.data.extend_from_slice(entropy_data);
        self.data.extend([MARKER_PREFIX, Marker::Eoi.code()]);
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_writer_stuffs_and_pads() {
        let mut writer = BitWriter::new();
        writer.write(0xff, 8);
        writer.write(0b01, 2);
        assert_eq!(writer.finish(), [0xff, 0x00, 0x7f]);
    }

    #[test]
    fn magnitude_categories() {
        assert_eq!(magnitude_bits(0), (0, 0));
        assert_eq!(magnitude_bits(-1), (1, 0));
        assert_eq!(magnitude_bits(-5), (3, 0b010));
        assert_eq!(magnitude_bits(1023), (10, 1023));
    }

    #[test]
    fn builder_frames_segments() {
        let data = JpegBuilder::new().segment(0xe0, &[1, 2]).finish(&[]);
        assert_eq!(data, [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x04, 1, 2, 0xff, 0xd9]);
    }
}
