// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Default pixel limit used by [`DecodeOptions::default_safe`], enough for a
/// 16384x16384 image.
pub const DEFAULT_PIXEL_LIMIT: usize = 1 << 28;

/// How the raw bits following a magnitude category are turned into a signed
/// coefficient when their leading bit is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagnitudeConvention {
    /// `value - (2^size - 1)`, ITU-T T.81 F.2.2.1 (EXTEND).
    #[default]
    Standard,
    /// `value - 2^(size - 1)`. Matches the output of older tooling built on
    /// this formula; not round-trip safe for categories above 1.
    Legacy,
}

impl MagnitudeConvention {
    /// Converts `size` raw bits (`value`) to a signed coefficient.
    /// ```
    /// # use jfif::options::MagnitudeConvention;
    /// assert_eq!(MagnitudeConvention::Standard.extend(0b010, 3), -5);
    /// assert_eq!(MagnitudeConvention::Legacy.extend(0b010, 3), -2);
    /// assert_eq!(MagnitudeConvention::Standard.extend(0b110, 3), 6);
    /// assert_eq!(MagnitudeConvention::Standard.extend(0, 0), 0);
    /// ```
    pub fn extend(self, value: u32, size: u8) -> i32 {
        if size == 0 {
            return 0;
        }
        let value = value as i32;
        if value >> (size - 1) != 0 {
            return value;
        }
        match self {
            MagnitudeConvention::Standard => value - ((1 << size) - 1),
            MagnitudeConvention::Legacy => value - (1 << (size - 1)),
        }
    }
}

/// How segments without a handler are stepped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentSkip {
    /// Skip by the segment's length field. Markers without one (SOI, EOI,
    /// RSTn, TEM) have an empty payload.
    #[default]
    DeclaredLength,
    /// Skip every byte up to the next 0xff. Breaks on payloads that contain
    /// 0xff (EXIF thumbnails, ICC profiles).
    ScanForMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecodeOptions {
    /// Defaults to [`MagnitudeConvention::Standard`], not the legacy formula.
    pub magnitude_convention: MagnitudeConvention,
    pub segment_skip: SegmentSkip,
    /// Fail decoding images with more than this number of pixels
    /// (width * height).
    pub pixel_limit: Option<usize>,
    /// Fail decoding images with more than this number of MCUs.
    pub max_mcus: Option<usize>,
}

impl Default for DecodeOptions {
    /// Skips unknown segments by their declared length, applies no limits and
    /// uses [`MagnitudeConvention::Standard`]. The legacy decoder behaves
    /// differently: it computes negative magnitudes as `value - 2^(size - 1)`
    /// and scans for the next 0xff. Use [`DecodeOptions::legacy`] to
    /// reproduce its output.
    fn default() -> Self {
        Self {
            magnitude_convention: MagnitudeConvention::Standard,
            segment_skip: SegmentSkip::DeclaredLength,
            pixel_limit: None,
            max_mcus: None,
        }
    }
}

impl DecodeOptions {
    /// Default behaviour with [`DEFAULT_PIXEL_LIMIT`] applied.
    pub fn default_safe() -> Self {
        Self {
            pixel_limit: Some(DEFAULT_PIXEL_LIMIT),
            ..Self::default()
        }
    }

    /// Reproduces the legacy decoder: marker scanning for unknown segments
    /// and the legacy magnitude formula.
    pub fn legacy() -> Self {
        Self {
            magnitude_convention: MagnitudeConvention::Legacy,
            segment_skip: SegmentSkip::ScanForMarker,
            ..Self::default()
        }
    }
}
