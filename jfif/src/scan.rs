// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    NUM_TABLE_SLOTS,
    byte_cursor::ByteCursor,
    error::{Error, Result},
    frame::FrameHeader,
    util::tracing_wrappers::*,
};

/// Table selectors for one component of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    pub component_id: u8,
    pub dc_tbl_idx: u8,
    pub ac_tbl_idx: u8,
}

/// Parsed SOS segment. Spectral selection and successive approximation
/// bytes are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
}

impl ScanHeader {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
    pub fn read(segment: &mut ByteCursor) -> Result<ScanHeader> {
        let num_components = segment.read_u8()? as usize;
        let available = segment.remaining().len();
        if available < 2 * num_components {
            return Err(Error::ComponentCountMismatch {
                declared: num_components,
                available,
            });
        }
        let mut components = Vec::with_capacity(num_components);
        for _ in 0..num_components {
            let component_id = segment.read_u8()?;
            let (dc_tbl_idx, ac_tbl_idx) = segment.read_nibbles()?;
            for id in [dc_tbl_idx, ac_tbl_idx] {
                if id as usize >= NUM_TABLE_SLOTS {
                    return Err(Error::InvalidTableId(id));
                }
            }
            trace!(component_id, dc_tbl_idx, ac_tbl_idx, "scan component");
            components.push(ScanComponent {
                component_id,
                dc_tbl_idx,
                ac_tbl_idx,
            });
        }
        let trailing = segment.remaining().len();
        if trailing != 3 {
            warn!(trailing, "unexpected number of spectral selection bytes");
        }
        debug!(num_components, "scan header");
        Ok(ScanHeader { components })
    }

    /// Binds the scan's table selectors to the frame components.
    pub fn apply(&self, frame: &mut FrameHeader) -> Result<()> {
        for sc in &self.components {
            let component = frame
                .components
                .get_mut(&sc.component_id)
                .ok_or(Error::UnknownComponent(sc.component_id))?;
            component.dc_tbl_idx = Some(sc.dc_tbl_idx);
            component.ac_tbl_idx = Some(sc.ac_tbl_idx);
        }
        Ok(())
    }
}
