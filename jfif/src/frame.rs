// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::BTreeMap;

use crate::{
    NUM_TABLE_SLOTS,
    byte_cursor::ByteCursor,
    error::{Error, Result},
    util::tracing_wrappers::*,
};

/// Image parameters from the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Image width in pixels
    pub width: u16,
    /// Image height in pixels
    pub height: u16,
    /// Sample precision in bits
    pub precision: u8,
}

/// JPEG component information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentInfo {
    /// Component ID
    pub id: u8,
    /// Horizontal sampling factor (1-4)
    pub h_samp_factor: u8,
    /// Vertical sampling factor (1-4)
    pub v_samp_factor: u8,
    /// Quantization table slot
    pub quant_idx: u8,
    /// DC Huffman table slot, assigned by the scan header
    pub dc_tbl_idx: Option<u8>,
    /// AC Huffman table slot, assigned by the scan header
    pub ac_tbl_idx: Option<u8>,
}

impl ComponentInfo {
    /// Number of 8x8 blocks this component contributes to one MCU.
    pub fn blocks_per_mcu(&self) -> usize {
        self.h_samp_factor as usize * self.v_samp_factor as usize
    }
}

/// Parsed SOF0 segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub image: ImageInfo,
    /// Components keyed by id, iterated in ascending id order.
    pub components: BTreeMap<u8, ComponentInfo>,
}

impl FrameHeader {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
    pub fn read(segment: &mut ByteCursor) -> Result<FrameHeader> {
        let precision = segment.read_u8()?;
        let height = segment.read_u16()?;
        let width = segment.read_u16()?;
        let num_components = segment.read_u8()? as usize;

        let available = segment.remaining().len();
        if available != 3 * num_components || num_components == 0 {
            return Err(Error::ComponentCountMismatch {
                declared: num_components,
                available,
            });
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width, height));
        }

        let mut components = BTreeMap::new();
        for _ in 0..num_components {
            let id = segment.read_u8()?;
            let (h_samp_factor, v_samp_factor) = segment.read_nibbles()?;
            let quant_idx = segment.read_u8()?;
            if !(1..=4).contains(&h_samp_factor) || !(1..=4).contains(&v_samp_factor) {
                return Err(Error::InvalidSamplingFactor(id, h_samp_factor, v_samp_factor));
            }
            if quant_idx as usize >= NUM_TABLE_SLOTS {
                return Err(Error::InvalidTableId(quant_idx));
            }
            trace!(id, h_samp_factor, v_samp_factor, quant_idx, "component");
            components.insert(
                id,
                ComponentInfo {
                    id,
                    h_samp_factor,
                    v_samp_factor,
                    quant_idx,
                    dc_tbl_idx: None,
                    ac_tbl_idx: None,
                },
            );
        }

        debug!(width, height, precision, num_components, "frame header");
        Ok(FrameHeader {
            image: ImageInfo {
                width,
                height,
                precision,
            },
            components,
        })
    }

    /// Largest horizontal and vertical sampling factors over all components.
    pub fn max_sampling(&self) -> (u8, u8) {
        self.components.values().fold((1, 1), |(h, v), c| {
            (h.max(c.h_samp_factor), v.max(c.v_samp_factor))
        })
    }
}
