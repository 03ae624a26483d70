//! Example: Reconstruct a cube from a synthetic 19-fiber exposure
//!
//! Builds big-endian plane bytes as a FITS reader would hand them over, wraps
//! them in an [`RssExposure`] for IFU design 1901 and reconstructs the 34x34
//! cube. Prints the coverage and the flux profile through the central row.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p seiya --example hex_bundle [config.yaml]
//! ```
//!
//! The optional YAML file holds a [`CubeConfig`], e.g.
//!
//! ```yaml
//! pixel_scale: 0.5
//! radius: 2.0
//! kernel:
//!   type: aperture
//!   fiber_radius: 1.0
//! ```

use std::env;

use anyhow::Context;
use seiya::byte_order::encode_f64;
use seiya::{ByteOrder, CubeConfig, IfuDesign, RssExposure};

const CHANNELS: usize = 8;
const FIBER_PITCH: f64 = 2.5;

fn main() -> anyhow::Result<()> {
    let _log_guard = common::setup_logging(
        &common::LogSettings::default().with_file("target/logs", "hex_bundle"),
    )?;

    let config = match env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            CubeConfig::from_yaml(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => CubeConfig::default(),
    };

    let positions = two_ring_bundle();
    let fibers = positions.len();
    let mut flux = Vec::with_capacity(CHANNELS * fibers);
    let mut ivar = Vec::with_capacity(CHANNELS * fibers);
    let mut xpos = Vec::with_capacity(CHANNELS * fibers);
    let mut ypos = Vec::with_capacity(CHANNELS * fibers);
    for channel in 0..CHANNELS {
        // Point source whose width grows toward the red end
        let sigma = 2.0 + 0.1 * channel as f64;
        for &(x, y) in &positions {
            flux.push(10.0 * (-(x * x + y * y) / (2.0 * sigma * sigma)).exp());
            ivar.push(25.0);
            xpos.push(x);
            ypos.push(y);
        }
    }

    let planes = [&flux, &ivar, &xpos, &ypos].map(|p| encode_f64(p, ByteOrder::Big));
    let exposure = RssExposure::from_bytes(
        "1901".parse::<IfuDesign>()?,
        CHANNELS,
        fibers,
        [&planes[0], &planes[1], &planes[2], &planes[3]].map(|p| p.as_slice()),
        ByteOrder::Big,
    )?;

    let cube = exposure.into_cube(&config)?;
    let (channels, rows, cols) = cube.shape();
    println!("cube: {channels} channels, {rows}x{cols} cells");

    let middle = rows / 2;
    for channel in [0, channels - 1] {
        println!(
            "channel {channel}: {} covered cells",
            cube.covered_cells(channel)
        );
        let profile: Vec<String> = cube
            .flux(channel)
            .row(middle)
            .iter()
            .map(|v| format!("{v:5.2}"))
            .collect();
        println!("  row {middle}: {}", profile.join(" "));
    }

    Ok(())
}

/// Center fiber plus two hexagonal rings, `FIBER_PITCH` apart.
fn two_ring_bundle() -> Vec<(f64, f64)> {
    let mut positions = vec![(0.0, 0.0)];
    for ring in 1..=2i32 {
        for q in -ring..=ring {
            for r in (-ring).max(-q - ring)..=ring.min(-q + ring) {
                if q.abs().max(r.abs()).max((q + r).abs()) == ring {
                    let x = FIBER_PITCH * (q as f64 + r as f64 * 0.5);
                    let y = FIBER_PITCH * r as f64 * 3.0f64.sqrt() * 0.5;
                    positions.push((x, y));
                }
            }
        }
    }
    positions
}
