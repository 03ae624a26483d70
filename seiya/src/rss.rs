//! In-memory row-stacked spectra exposure.
//!
//! The hand-off point between a file reader and the reconstruction: it owns
//! the four planes as loaded, remembers their byte order and the IFU design,
//! and turns them into a cube with the shape that design calls for.

use crate::byte_order::{self, ByteOrder};
use crate::cube::{self, Cube, CubeConfig};
use crate::error::{Error, Result};
use crate::ifu::IfuDesign;
use crate::samples::RssSamples;

/// One exposure: `[channels][fibers]` flux, ivar and sky positions.
#[derive(Debug, Clone)]
pub struct RssExposure {
    pub ifu_design: IfuDesign,
    channels: usize,
    fibers: usize,
    flux: Vec<f64>,
    ivar: Vec<f64>,
    xpos: Vec<f64>,
    ypos: Vec<f64>,
    byte_order: ByteOrder,
}

impl RssExposure {
    /// Native-order planes, each of length `channels * fibers`.
    pub fn new(
        ifu_design: IfuDesign,
        channels: usize,
        fibers: usize,
        flux: Vec<f64>,
        ivar: Vec<f64>,
        xpos: Vec<f64>,
        ypos: Vec<f64>,
    ) -> Result<Self> {
        // Validate eagerly so a bad reader fails at load time
        RssSamples::from_slices(&flux, &ivar, &xpos, &ypos, channels, fibers)?;
        Ok(Self {
            ifu_design,
            channels,
            fibers,
            flux,
            ivar,
            xpos,
            ypos,
            byte_order: ByteOrder::native(),
        })
    }

    /// Planes that were reinterpreted from bytes of `order` without conversion.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Build from raw plane bytes of a declared order.
    pub fn from_bytes(
        ifu_design: IfuDesign,
        channels: usize,
        fibers: usize,
        planes: [&[u8]; 4],
        order: ByteOrder,
    ) -> Result<Self> {
        let [flux, ivar, xpos, ypos] = planes;
        Self::new(
            ifu_design,
            channels,
            fibers,
            byte_order::decode_f64(flux, order)?,
            byte_order::decode_f64(ivar, order)?,
            byte_order::decode_f64(xpos, order)?,
            byte_order::decode_f64(ypos, order)?,
        )
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn fibers(&self) -> usize {
        self.fibers
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Bring all planes to native byte order.
    pub fn normalize_byte_order(&mut self) {
        let order = self.byte_order;
        if order.is_native() {
            return;
        }
        for plane in [
            &mut self.flux,
            &mut self.ivar,
            &mut self.xpos,
            &mut self.ypos,
        ] {
            byte_order::normalize_in_place(plane, order);
        }
        self.byte_order = ByteOrder::native();
    }

    /// Borrowed view for [`cube::reconstruct`].
    ///
    /// Fails with [`Error::ForeignByteOrder`] until the planes are normalized.
    pub fn samples(&self) -> Result<RssSamples<'_>> {
        if !self.byte_order.is_native() {
            return Err(Error::ForeignByteOrder {
                order: self.byte_order,
            });
        }
        RssSamples::from_slices(
            &self.flux,
            &self.ivar,
            &self.xpos,
            &self.ypos,
            self.channels,
            self.fibers,
        )
    }

    /// Normalize byte order, look up the grid for the IFU design and reconstruct.
    ///
    /// Fails with [`Error::NotImplemented`] before any work for IFU sizes
    /// without a known grid.
    pub fn into_cube(mut self, config: &CubeConfig) -> Result<Cube> {
        let shape = self.ifu_design.cube_shape()?;
        self.normalize_byte_order();
        let samples = self.samples()?;
        cube::reconstruct(&samples, shape, config)
    }
}
