// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    bit_reader::BitReader,
    byte_cursor::ByteCursor,
    error::{Error, Result},
    frame::{ComponentInfo, FrameHeader, ImageInfo},
    huffman::HuffmanTables,
    marker::{MARKER_PREFIX, Marker, SOI},
    mcu::{Block, Mcu, McuDecoder, McuGrid, mcu_grid, mcu_structure},
    options::{DecodeOptions, SegmentSkip},
    quant::QuantizationTables,
    scan::ScanHeader,
    util::tracing_wrappers::*,
};

/// A marker segment the decoder has no handler for, kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSegment {
    pub marker: Marker,
    pub payload: Vec<u8>,
}

fn find_skipped(segments: &[SkippedSegment], code: u8) -> impl Iterator<Item = &SkippedSegment> {
    segments.iter().filter(move |s| s.marker.code() == code)
}

/// Everything up to and including the scan header.
#[derive(Debug, Clone)]
pub struct Headers {
    /// Frame header with the scan's table selectors applied.
    pub frame: FrameHeader,
    pub scan: ScanHeader,
    pub quantization_tables: QuantizationTables,
    pub huffman_tables: HuffmanTables,
    pub skipped_segments: Vec<SkippedSegment>,
    /// Offset of the first entropy-coded byte.
    pub scan_data_offset: usize,
}

impl Headers {
    pub fn skipped(&self, code: u8) -> impl Iterator<Item = &SkippedSegment> {
        find_skipped(&self.skipped_segments, code)
    }
}

/// Quantized DCT coefficients of a baseline image, one [`Mcu`] per grid cell
/// in raster order.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: ImageInfo,
    /// Components in ascending id order.
    pub components: Vec<ComponentInfo>,
    /// Component id of each block within an MCU.
    pub mcu_structure: Vec<u8>,
    pub mcu_grid: McuGrid,
    pub mcus: Vec<Mcu>,
    pub quantization_tables: QuantizationTables,
    pub huffman_tables: HuffmanTables,
    pub skipped_segments: Vec<SkippedSegment>,
}

impl DecodedImage {
    /// Skipped segments with the given marker code, in stream order.
    pub fn skipped(&self, code: u8) -> impl Iterator<Item = &SkippedSegment> {
        find_skipped(&self.skipped_segments, code)
    }

    /// Blocks of component `id` in stream order.
    pub fn component_blocks(&self, id: u8) -> impl Iterator<Item = &Block> {
        self.mcus.iter().flat_map(move |mcu| {
            mcu.blocks
                .iter()
                .zip(&self.mcu_structure)
                .filter(move |&(_, &c)| c == id)
                .map(|(block, _)| block)
        })
    }
}

/// State of one decode call.
struct DecodingSession<'a, 'o> {
    options: &'o DecodeOptions,
    cursor: ByteCursor<'a>,
    quantization_tables: QuantizationTables,
    huffman_tables: HuffmanTables,
    frame: Option<FrameHeader>,
    skipped_segments: Vec<SkippedSegment>,
}

impl<'a, 'o> DecodingSession<'a, 'o> {
    fn new(data: &'a [u8], options: &'o DecodeOptions) -> Self {
        DecodingSession {
            options,
            cursor: ByteCursor::new(data),
            quantization_tables: QuantizationTables::default(),
            huffman_tables: HuffmanTables::default(),
            frame: None,
            skipped_segments: Vec::new(),
        }
    }

    fn read_soi(&mut self) -> Result<()> {
        let bytes = self.cursor.take(SOI.len())?;
        if bytes != SOI {
            return Err(Error::MissingStartOfImage(bytes[0], bytes[1]));
        }
        Ok(())
    }

    fn read_marker(&mut self) -> Result<Marker> {
        let prefix = self.cursor.read_u8()?;
        if prefix != MARKER_PREFIX {
            return Err(Error::MalformedMarker(prefix));
        }
        // Fill bytes.
        while self.cursor.peek() == Some(MARKER_PREFIX) {
            self.cursor.read_u8()?;
        }
        Ok(Marker::from(self.cursor.read_u8()?))
    }

    fn skip_segment(&mut self, marker: Marker) -> Result<()> {
        let payload = match self.options.segment_skip {
            SegmentSkip::DeclaredLength if marker.has_length() => {
                self.cursor.split_segment(marker.code())?.remaining()
            }
            SegmentSkip::DeclaredLength => &[],
            SegmentSkip::ScanForMarker => self.cursor.skip_until(MARKER_PREFIX),
        };
        debug!(?marker, len = payload.len(), "skipping segment");
        self.skipped_segments.push(SkippedSegment {
            marker,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn check_pixel_limit(&self, image: &ImageInfo) -> Result<()> {
        let pixels = image.width as usize * image.height as usize;
        match self.options.pixel_limit {
            Some(limit) if pixels > limit => Err(Error::LimitExceeded("pixel", pixels, limit)),
            _ => Ok(()),
        }
    }

    /// Dispatches marker segments until the scan header has been read.
    fn read_headers(mut self) -> Result<Headers> {
        self.read_soi()?;
        loop {
            let marker = self.read_marker()?;
            trace!(?marker, position = self.cursor.position(), "marker");
            match marker {
                Marker::Dqt => {
                    let mut segment = self.cursor.split_segment(marker.code())?;
                    self.quantization_tables.read_segment(&mut segment)?;
                }
                Marker::Dht => {
                    let mut segment = self.cursor.split_segment(marker.code())?;
                    self.huffman_tables.read_segment(&mut segment)?;
                }
                Marker::Sof0 => {
                    let mut segment = self.cursor.split_segment(marker.code())?;
                    let frame = FrameHeader::read(&mut segment)?;
                    self.check_pixel_limit(&frame.image)?;
                    self.frame = Some(frame);
                }
                Marker::Sof(code) => return Err(Error::UnsupportedFrame(code)),
                Marker::Sos => {
                    let mut frame = self.frame.take().ok_or(Error::MissingFrameHeader)?;
                    let mut segment = self.cursor.split_segment(marker.code())?;
                    let scan = ScanHeader::read(&mut segment)?;
                    scan.apply(&mut frame)?;
                    return Ok(Headers {
                        frame,
                        scan,
                        quantization_tables: self.quantization_tables,
                        huffman_tables: self.huffman_tables,
                        skipped_segments: self.skipped_segments,
                        scan_data_offset: self.cursor.position(),
                    });
                }
                _ => self.skip_segment(marker)?,
            }
        }
    }
}

/// Parses marker segments up to and including the scan header, without
/// touching the entropy-coded data.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
pub fn read_headers(data: &[u8], options: &DecodeOptions) -> Result<Headers> {
    DecodingSession::new(data, options).read_headers()
}

/// Decodes baseline JPEG streams to quantized coefficients.
///
/// Holds only options; every call to [`JpegDecoder::decode`] is independent.
#[derive(Debug, Clone, Default)]
pub struct JpegDecoder {
    options: DecodeOptions,
}

impl JpegDecoder {
    pub fn new(options: DecodeOptions) -> JpegDecoder {
        JpegDecoder { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
    pub fn decode(&self, data: &[u8]) -> Result<DecodedImage> {
        let headers = read_headers(data, &self.options)?;
        let frame = &headers.frame;
        let grid = mcu_grid(frame);
        if let Some(limit) = self.options.max_mcus.filter(|&limit| grid.count() > limit) {
            return Err(Error::LimitExceeded("MCU", grid.count(), limit));
        }
        let decoder = McuDecoder::new(
            frame,
            &headers.huffman_tables,
            &headers.quantization_tables,
            self.options.magnitude_convention,
        )?;

        let entropy_data = &data[headers.scan_data_offset..];
        // Every block takes at least two bits.
        let max_mcus = entropy_data.len() * 8 / (2 * decoder.blocks_per_mcu()) + 1;
        let mut mcus = Vec::with_capacity(grid.count().min(max_mcus));
        let mut br = BitReader::new(entropy_data);
        for _ in 0..grid.count() {
            mcus.push(decoder.decode_mcu(&mut br)?);
        }
        debug!(
            num_mcus = mcus.len(),
            bits = br.total_bits_read(),
            "entropy-coded data"
        );

        Ok(DecodedImage {
            image: frame.image,
            components: frame.components.values().copied().collect(),
            mcu_structure: mcu_structure(frame),
            mcu_grid: grid,
            mcus,
            quantization_tables: headers.quantization_tables,
            huffman_tables: headers.huffman_tables,
            skipped_segments: headers.skipped_segments,
        })
    }
}

/// Decodes `data` with [`DecodeOptions::default`].
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    JpegDecoder::default().decode(data)
}
