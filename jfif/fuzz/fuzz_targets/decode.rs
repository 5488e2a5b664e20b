// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jfif::{DecodeOptions, JpegDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = JpegDecoder::new(DecodeOptions::default_safe());
    if let Ok(image) = decoder.decode(data) {
        assert_eq!(image.mcus.len(), image.mcu_grid.count());
        for mcu in &image.mcus {
            assert_eq!(mcu.blocks.len(), image.mcu_structure.len());
        }
    }
});
