// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Baseline JPEG (JFIF) decoding down to quantized DCT coefficients.
//!
//! Marker segments are parsed up to the scan header, then the
//! entropy-coded data is decoded into one [`mcu::Mcu`] per grid cell. Blocks
//! are kept in zig-zag order, neither dequantized nor DC-predicted.
//!
//! ```no_run
//! let data = std::fs::read("image.jpg").unwrap();
//! let image = jfif::decode(&data)?;
//! for (id, block) in image.mcu_structure.iter().zip(&image.mcus[0].blocks) {
//!     println!("component {id}: dc {}", block.dc());
//! }
//! # Ok::<(), jfif::Error>(())
//! ```

#![deny(unsafe_code)]
pub mod bit_reader;
pub mod byte_cursor;
pub mod decode;
pub mod error;
pub mod frame;
pub mod huffman;
pub mod marker;
pub mod mcu;
pub mod options;
pub mod quant;
pub mod scan;
mod util;

pub const BLOCK_DIM: usize = 8;
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;
/// Quantization and Huffman table ids range over 0..4.
pub const NUM_TABLE_SLOTS: usize = 4;

pub use decode::{DecodedImage, Headers, JpegDecoder, SkippedSegment, decode, read_headers};
pub use error::{Error, Result};
pub use options::{DecodeOptions, MagnitudeConvention, SegmentSkip};
