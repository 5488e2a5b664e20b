// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jfif::{DecodeOptions, read_headers};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut options = DecodeOptions::legacy();
    options.pixel_limit = DecodeOptions::default_safe().pixel_limit;
    if let Ok(headers) = read_headers(data, &options) {
        assert!(headers.scan_data_offset <= data.len());
    }
});
