// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

use crate::huffman::{HUFFMAN_MAX_BITS, HuffmanClass};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unexpected end of stream")]
    UnexpectedEndOfStream,
    #[error("Invalid start of image {0:02x}{1:02x}, expected ffd8")]
    MissingStartOfImage(u8, u8),
    #[error("Malformed marker: expected ff, found {0:02x}")]
    MalformedMarker(u8),
    #[error("Unsupported frame type {0:02x}, only baseline (c0) is supported")]
    UnsupportedFrame(u8),
    #[error("Invalid length {1} for segment {0:02x}")]
    InvalidSegmentLength(u8, usize),
    #[error("Component count mismatch: {declared} declared, {available} bytes of component data")]
    ComponentCountMismatch { declared: usize, available: usize },
    #[error("Symbol count mismatch: {expected} codes, {available} symbol bytes")]
    SymbolCountMismatch { expected: usize, available: usize },
    #[error("Invalid Huffman table class {0}")]
    InvalidTableClass(u8),
    #[error("Invalid table id {0}, max is 3")]
    InvalidTableId(u8),
    #[error("Invalid sampling factors {1}x{2} for component {0}")]
    InvalidSamplingFactor(u8, u8, u8),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(u16, u16),
    #[error("Invalid Huffman table: code lengths over-subscribe {0} bits")]
    InvalidHuffmanTable(usize),
    #[error("Scan header found before frame header")]
    MissingFrameHeader,
    #[error("Scan references unknown component {0}")]
    UnknownComponent(u8),
    #[error("Component {0} is not part of the scan")]
    ComponentNotInScan(u8),
    #[error("Missing {0:?} Huffman table {1}")]
    MissingHuffmanTable(HuffmanClass, u8),
    #[error("Missing quantization table {0}")]
    MissingQuantizationTable(u8),
    #[error("Invalid byte stuffing: ff followed by {0:02x}")]
    InvalidByteStuffing(u8),
    #[error("No Huffman code matched within {} bits", HUFFMAN_MAX_BITS)]
    HuffmanDecodeOverflow,
    #[error("Invalid magnitude category {0}")]
    InvalidMagnitudeCategory(u8),
    #[error("AC run overflows the block: coefficient index {0} > 63")]
    CoefficientOverflow(usize),
    #[error("{0} limit exceeded: {1} > {2}")]
    LimitExceeded(&'static str, usize, usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
