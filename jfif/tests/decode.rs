// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use jfif::{
    DecodeOptions, Error, JpegDecoder, MagnitudeConvention, decode, frame::ImageInfo,
    huffman::HuffmanClass, marker::Marker, mcu::McuGrid,
};

/// 8x8 grayscale image with small custom Huffman tables.
///
/// DC codes: 00 -> 0, 01 -> 2, 10 -> 3.
/// AC codes: 00 -> EOB, 01 -> (0,1), 10 -> (1,2), 110 -> ZRL.
///
/// Entropy-coded bits:
/// 10 010 | 01 1 | 10 00 | 110 | 01 0 | 00 | 1111
/// DC cat 3 "010", (0,1) "1", (1,2) "00", ZRL, (0,1) "0", EOB, padding.
fn grayscale_8x8() -> Vec<u8> {
    let mut data = vec![0xff, 0xd8];
    data.extend([0xff, 0xdb, 0x00, 0x43, 0x00]);
    data.extend([0x01; 64]);
    data.extend([
        0xff, 0xc0, 0x00, 0x0b, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00,
    ]);
    data.extend([0xff, 0xc4, 0x00, 0x16, 0x00]);
    data.extend([0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    data.extend([0x00, 0x02, 0x03]);
    data.extend([0xff, 0xc4, 0x00, 0x17, 0x10]);
    data.extend([0, 3, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    data.extend([0x00, 0x01, 0x12, 0xf0]);
    data.extend([0xff, 0xda, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3f, 0x00]);
    data.extend([0x93, 0x8c, 0x8f]);
    data.extend([0xff, 0xd9]);
    data
}

#[test]
fn grayscale_single_block() -> Result<(), Error> {
    let image = decode(&grayscale_8x8())?;
    assert_eq!(
        image.image,
        ImageInfo {
            width: 8,
            height: 8,
            precision: 8
        }
    );
    assert_eq!(image.mcu_structure, [1]);
    assert_eq!(image.mcu_grid, McuGrid { columns: 1, rows: 1 });
    assert_eq!(image.mcus.len(), 1);
    assert_eq!(image.mcus[0].blocks.len(), 1);

    let mut expected = [0; 64];
    expected[0] = -5;
    expected[1] = 1;
    expected[3] = -3;
    expected[20] = -1;
    assert_eq!(image.mcus[0].blocks[0].coefficients, expected);
    assert_eq!(image.quantization_tables.get(0).unwrap().values, [1; 64]);
    assert_eq!(
        image.huffman_tables.defined().collect::<Vec<_>>(),
        [(HuffmanClass::Dc, 0), (HuffmanClass::Ac, 0)]
    );
    Ok(())
}

#[test]
fn grayscale_single_block_legacy_magnitudes() -> Result<(), Error> {
    let mut options = DecodeOptions::default();
    options.magnitude_convention = MagnitudeConvention::Legacy;
    let image = JpegDecoder::new(options).decode(&grayscale_8x8())?;
    let mut expected = [0; 64];
    expected[0] = -2;
    expected[1] = 1;
    expected[3] = -2;
    expected[20] = -1;
    assert_eq!(image.mcus[0].blocks[0].coefficients, expected);
    Ok(())
}

#[test]
fn missing_start_of_image() {
    let mut data = grayscale_8x8();
    data[0] = 0x00;
    assert_eq!(decode(&data).err(), Some(Error::MissingStartOfImage(0x00, 0xd8)));
    assert_eq!(decode(&[]).err(), Some(Error::UnexpectedEndOfStream));
}

#[test]
fn app_segment_is_skipped_by_length() -> Result<(), Error> {
    let original = grayscale_8x8();
    let mut data = original[..2].to_vec();
    // APP1 whose payload looks like markers.
    data.extend([0xff, 0xe1, 0x00, 0x08, 0xff, 0xd9, 0xff, 0x00, 0xff, 0xda]);
    data.extend(&original[2..]);

    let image = decode(&data)?;
    assert_eq!(image.skipped_segments.len(), 1);
    assert_eq!(image.skipped_segments[0].marker, Marker::App(1));
    assert_eq!(
        image.skipped(0xe1).next().map(|s| s.payload.as_slice()),
        Some([0xff, 0xd9, 0xff, 0x00, 0xff, 0xda].as_slice())
    );
    assert_eq!(image.mcus, decode(&original)?.mcus);
    Ok(())
}

#[test]
fn truncated_stream() {
    let data = grayscale_8x8();
    for len in [1, 3, 20, 100, data.len() - 3] {
        assert!(decode(&data[..len]).is_err(), "{len}");
    }
    // EOI is never read.
    let image = decode(&data[..data.len() - 2]);
    assert!(image.is_ok());
}

#[test]
fn decoder_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<JpegDecoder>();
}
