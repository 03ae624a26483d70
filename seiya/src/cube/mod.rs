//! Datacube reconstruction from scattered fiber samples.
//!
//! Each spectral channel is resampled independently onto a regular spatial
//! grid with a drizzle-style weighted accumulation: every sample contributes to
//! all cells whose centers lie within a cutoff radius, weighted by a radially
//! symmetric kernel and by its inverse variance.
//!
//! # Pipeline
//!
//! 1. Validate the four `[channels][fibers]` arrays and the output shape.
//! 2. Resolve the grid origin once for the whole exposure.
//! 3. Per channel (in parallel): index usable samples, build the cell →
//!    contribution map, accumulate flux and inverse variance.
//!
//! Contributions to a cell are always summed in ascending sample order, so the
//! result is bit-identical regardless of thread count.
//!
//! Inputs must be native-endian. Arrays read from big-endian containers go
//! through [`crate::byte_order`] first; the kernel cannot detect swapped bytes.

mod accumulate;
mod config;
mod contributions;
mod grid;
mod kernel;
mod spatial;


use std::time::Instant;

use common::Plane2;
use glam::DVec2;
use rayon::prelude::*;

use crate::error::Result;
use crate::samples::{ChannelSlice, RssArray, RssSamples};

pub use accumulate::{ivar_scale, CellAccumulator};
pub use config::CubeConfig;
pub use contributions::{Contribution, ContributionMap};
pub use grid::{GridGeometry, GridOrigin, GridShape};
pub use kernel::ResampleKernel;

/// Reconstructed flux and inverse-variance cubes, co-indexed
/// `[channel][row][col]`.
#[derive(Debug, Clone)]
pub struct Cube {
    flux: Vec<Plane2<f64>>,
    ivar: Vec<Plane2<f64>>,
    geometry: GridGeometry,
}

impl Cube {
    /// `(channels, rows, cols)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        let shape = self.geometry.shape();
        (self.flux.len(), shape.rows(), shape.cols())
    }

    pub fn channels(&self) -> usize {
        self.flux.len()
    }

    /// Grid mapping shared by every channel.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn flux(&self, channel: usize) -> &Plane2<f64> {
        &self.flux[channel]
    }

    pub fn ivar(&self, channel: usize) -> &Plane2<f64> {
        &self.ivar[channel]
    }

    pub fn flux_at(&self, channel: usize, row: usize, col: usize) -> f64 {
        self.flux[channel][(row, col)]
    }

    pub fn ivar_at(&self, channel: usize, row: usize, col: usize) -> f64 {
        self.ivar[channel][(row, col)]
    }

    /// Whether any sample contributed to the cell.
    pub fn is_covered(&self, channel: usize, row: usize, col: usize) -> bool {
        self.ivar_at(channel, row, col) > 0.0
    }

    /// Number of cells with data in `channel`.
    pub fn covered_cells(&self, channel: usize) -> usize {
        self.ivar[channel]
            .values()
            .iter()
            .filter(|&&v| v > 0.0)
            .count()
    }

    /// Flatten both cubes channel-major into `C * rows * cols` vectors.
    pub fn to_flat(&self) -> (Vec<f64>, Vec<f64>) {
        let flatten = |planes: &[Plane2<f64>]| {
            planes
                .iter()
                .flat_map(|p| p.values().iter().copied())
                .collect::<Vec<f64>>()
        };
        (flatten(&self.flux), flatten(&self.ivar))
    }

    pub fn into_planes(self) -> (Vec<Plane2<f64>>, Vec<Plane2<f64>>) {
        (self.flux, self.ivar)
    }
}

/// Reconstruct a cube from four `[channels][fibers]` arrays.
///
/// Fails with [`crate::Error::ShapeMismatch`] when the arrays disagree in
/// shape and with [`crate::Error::UnsupportedShape`] when `rows <= 0` or
/// `cols <= 0`. Nothing is computed on failure.
pub fn cubify(
    flux: RssArray<'_>,
    ivar: RssArray<'_>,
    x: RssArray<'_>,
    y: RssArray<'_>,
    shape: (isize, isize),
    config: &CubeConfig,
) -> Result<Cube> {
    let samples = RssSamples::new(flux, ivar, x, y)?;
    let shape = GridShape::try_from(shape)?;
    reconstruct(&samples, shape, config)
}

/// Reconstruct a cube from already validated samples.
pub fn reconstruct(
    samples: &RssSamples<'_>,
    shape: GridShape,
    config: &CubeConfig,
) -> Result<Cube> {
    config.validate()?;

    let origin = match config.origin {
        GridOrigin::Centroid => samples.position_centroid().unwrap_or(DVec2::ZERO),
        GridOrigin::Fixed { x, y } => DVec2::new(x, y),
    };
    let geometry = GridGeometry::new(shape, config.pixel_scale, origin);
    let kernel_fn = config.kernel.weight_fn();

    tracing::info!(
        channels = samples.channels(),
        fibers = samples.fibers(),
        rows = shape.rows(),
        cols = shape.cols(),
        pixel_scale = config.pixel_scale,
        radius = config.radius,
        kernel = ?config.kernel,
        origin_x = origin.x,
        origin_y = origin.y,
        "Starting cube reconstruction"
    );
    let start = Instant::now();

    let (flux, ivar): (Vec<_>, Vec<_>) = (0..samples.channels())
        .into_par_iter()
        .map(|c| {
            let planes =
                reconstruct_channel(&samples.channel(c), &geometry, config, &*kernel_fn);
            tracing::debug!(
                channel = c,
                covered = planes.1.values().iter().filter(|&&v| v > 0.0).count(),
                "Channel reconstructed"
            );
            planes
        })
        .unzip();

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Cube reconstruction finished"
    );

    Ok(Cube {
        flux,
        ivar,
        geometry,
    })
}

/// Flux and ivar planes for one channel.
fn reconstruct_channel(
    slice: &ChannelSlice<'_>,
    geometry: &GridGeometry,
    config: &CubeConfig,
    kernel_fn: &(dyn Fn(f64) -> f64 + Send + Sync),
) -> (Plane2<f64>, Plane2<f64>) {
    let shape = geometry.shape();
    let map = ContributionMap::build(slice, geometry, config.radius, kernel_fn);

    let max_ivar = slice
        .usable_indices()
        .map(|i| slice.sample(i).ivar)
        .fold(0.0, f64::max);
    let scale = accumulate::ivar_scale(max_ivar);

    let mut flux = Plane2::new_filled(shape.rows(), shape.cols(), config.fill_value);
    let mut ivar = Plane2::new_default(shape.rows(), shape.cols());

    for (offset, (f, iv)) in flux
        .values_mut()
        .iter_mut()
        .zip(ivar.values_mut())
        .enumerate()
    {
        let mut acc = CellAccumulator::with_ivar_scale(scale);
        for contribution in map.cell(offset) {
            let sample = slice.sample(contribution.sample);
            acc.add(contribution.weight, sample.flux, sample.ivar);
        }
        *f = acc.flux(config.fill_value);
        *iv = acc.ivar();
    }

    (flux, ivar)
}
