// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use jfif::{DecodeOptions, DecodedImage, JpegDecoder, MagnitudeConvention, SegmentSkip};

#[derive(Parser)]
#[command(about = "Decodes a baseline JPEG to quantized DCT coefficients")]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Print the coefficients of the first N blocks
    #[clap(long, value_name = "N")]
    dump_blocks: Option<usize>,

    /// Use the legacy formula for negative magnitudes
    #[clap(long)]
    legacy_magnitude: bool,

    /// Skip unknown segments by scanning for the next 0xff byte
    #[clap(long)]
    scan_skip: bool,

    /// Fail on images with more than N MCUs
    #[clap(long, value_name = "N")]
    max_mcus: Option<usize>,
}

impl Opt {
    fn decode_options(&self) -> DecodeOptions {
        let mut options = DecodeOptions::default_safe();
        if self.legacy_magnitude {
            options.magnitude_convention = MagnitudeConvention::Legacy;
        }
        if self.scan_skip {
            options.segment_skip = SegmentSkip::ScanForMarker;
        }
        options.max_mcus = self.max_mcus;
        options
    }
}

fn print_summary(image: &DecodedImage) {
    println!(
        "{}x{}, {}-bit, {} components",
        image.image.width,
        image.image.height,
        image.image.precision,
        image.components.len()
    );
    for c in &image.components {
        println!(
            "  component {}: sampling {}x{}, quant {}, dc {}, ac {}",
            c.id,
            c.h_samp_factor,
            c.v_samp_factor,
            c.quant_idx,
            c.dc_tbl_idx.unwrap_or_default(),
            c.ac_tbl_idx.unwrap_or_default()
        );
    }
    for table in image.quantization_tables.iter() {
        let bits = if table.precision == 0 { 8 } else { 16 };
        println!("  quantization table {}: {bits}-bit, dc step {}", table.id, table.values[0]);
    }
    for (class, id) in image.huffman_tables.defined() {
        println!("  huffman table {class:?} {id}");
    }
    for segment in &image.skipped_segments {
        println!("  skipped {:?}: {} bytes", segment.marker, segment.payload.len());
    }
    println!(
        "MCU grid {}x{}, {} blocks per MCU {:?}",
        image.mcu_grid.columns,
        image.mcu_grid.rows,
        image.mcu_structure.len(),
        image.mcu_structure
    );
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    let data = std::fs::read(&opt.input)
        .wrap_err_with(|| format!("Failed to read {:?}", opt.input))?;
    let decoder = JpegDecoder::new(opt.decode_options());
    let image = decoder
        .decode(&data)
        .wrap_err_with(|| format!("Failed to decode {:?}", opt.input))?;

    print_summary(&image);

    if let Some(n) = opt.dump_blocks {
        let blocks = image
            .mcus
            .iter()
            .enumerate()
            .flat_map(|(i, mcu)| {
                mcu.blocks
                    .iter()
                    .zip(&image.mcu_structure)
                    .map(move |(block, id)| (i, id, block))
            })
            .take(n);
        for (mcu, component, block) in blocks {
            println!("MCU {mcu} component {component}: {block:?}");
        }
    }
    Ok(())
}
