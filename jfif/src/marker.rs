// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! JPEG marker codes (ITU-T T.81 Table B.1).

/// Every marker starts with this byte.
pub const MARKER_PREFIX: u8 = 0xff;
/// Start of image, the first two bytes of every JPEG stream.
pub const SOI: [u8; 2] = [MARKER_PREFIX, 0xd8];

/// A marker, classified by how the header parser treats its segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// Start of frame, baseline DCT.
    Sof0,
    /// Any other start of frame (extended, progressive, lossless,
    /// differential or arithmetic coded).
    Sof(u8),
    /// Define Huffman tables.
    Dht,
    /// Define quantization tables.
    Dqt,
    /// Start of scan.
    Sos,
    Soi,
    Eoi,
    /// Restart with modulo 8 count.
    Rst(u8),
    /// Temporary private use in arithmetic coding.
    Tem,
    /// Application segment APP0..APP15.
    App(u8),
    Com,
    /// Everything else (DRI, DNL, DAC, DHP, EXP, JPGn, reserved).
    Other(u8),
}

impl From<u8> for Marker {
    fn from(code: u8) -> Self {
        match code {
            0xc0 => Marker::Sof0,
            0xc4 => Marker::Dht,
            // 0xc8 is JPG and 0xcc is DAC, neither starts a frame.
            0xc1..=0xcf if code != 0xc8 && code != 0xcc => Marker::Sof(code),
            0xd0..=0xd7 => Marker::Rst(code - 0xd0),
            0xd8 => Marker::Soi,
            0xd9 => Marker::Eoi,
            0xda => Marker::Sos,
            0xdb => Marker::Dqt,
            0xe0..=0xef => Marker::App(code - 0xe0),
            0xfe => Marker::Com,
            0x01 => Marker::Tem,
            _ => Marker::Other(code),
        }
    }
}

impl Marker {
    /// The second byte of the marker.
    pub fn code(self) -> u8 {
        match self {
            Marker::Sof0 => 0xc0,
            Marker::Sof(code) | Marker::Other(code) => code,
            Marker::Dht => 0xc4,
            Marker::Dqt => 0xdb,
            Marker::Sos => 0xda,
            Marker::Soi => 0xd8,
            Marker::Eoi => 0xd9,
            Marker::Rst(n) => 0xd0 + n,
            Marker::Tem => 0x01,
            Marker::App(n) => 0xe0 + n,
            Marker::Com => 0xfe,
        }
    }

    /// Whether a two-byte length field follows the marker.
    pub fn has_length(self) -> bool {
        !matches!(
            self,
            Marker::Soi | Marker::Eoi | Marker::Rst(_) | Marker::Tem
        )
    }
}
