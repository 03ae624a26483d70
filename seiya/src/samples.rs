//! Ingestion of row-stacked spectra samples.
//!
//! Inputs are four `[channels][fibers]` arrays (flux, inverse variance, x and y
//! sky positions) stored channel-major in flat slices. Values must already be in
//! native byte order; see [`crate::byte_order`] for the normalizer that runs
//! before this point.

use common::FloatExt;
use glam::DVec2;

use crate::error::{Error, Result};

/// Borrowed `[channels][fibers]` array of f64 values, channel-major.
#[derive(Debug, Clone, Copy)]
pub struct RssArray<'a> {
    data: &'a [f64],
    channels: usize,
    fibers: usize,
}

impl<'a> RssArray<'a> {
    /// Wrap `data` as a `(channels, fibers)` array.
    ///
    /// Fails with [`Error::ShapeMismatch`] when `data.len() != channels * fibers`
    /// or the product overflows.
    pub fn new(data: &'a [f64], channels: usize, fibers: usize) -> Result<Self> {
        if channels.checked_mul(fibers) != Some(data.len()) {
            return Err(Error::ShapeMismatch {
                array: "data",
                expected: (channels, fibers),
                actual: (data.len() / fibers.max(1), fibers),
            });
        }
        Ok(Self {
            data,
            channels,
            fibers,
        })
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.fibers)
    }

    #[inline]
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &'a [f64] {
        let start = channel * self.fibers;
        &self.data[start..start + self.fibers]
    }
}

/// One scattered measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub flux: f64,
    pub ivar: f64,
    pub x: f64,
    pub y: f64,
}

impl Sample {
    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Whether the sample may contribute weight.
    ///
    /// NaN/Inf in flux, position or ivar, and `ivar <= 0`, all mark the sample
    /// as unmeasured.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.flux.is_measured()
            && self.x.is_measured()
            && self.y.is_measured()
            && self.ivar.is_measured()
            && self.ivar > 0.0
    }
}

/// All samples of one spectral channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSlice<'a> {
    pub flux: &'a [f64],
    pub ivar: &'a [f64],
    pub x: &'a [f64],
    pub y: &'a [f64],
}

impl ChannelSlice<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.flux.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    #[inline]
    pub fn sample(&self, index: usize) -> Sample {
        Sample {
            flux: self.flux[index],
            ivar: self.ivar[index],
            x: self.x[index],
            y: self.y[index],
        }
    }

    /// Indices of usable samples, ascending.
    pub fn usable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&i| self.sample(i).is_usable())
    }
}

/// Validated set of four co-shaped arrays.
#[derive(Debug, Clone, Copy)]
pub struct RssSamples<'a> {
    flux: RssArray<'a>,
    ivar: RssArray<'a>,
    x: RssArray<'a>,
    y: RssArray<'a>,
}

impl<'a> RssSamples<'a> {
    /// Check that all four arrays share one `(channels, fibers)` shape.
    ///
    /// The flux array defines the expected shape.
    pub fn new(
        flux: RssArray<'a>,
        ivar: RssArray<'a>,
        x: RssArray<'a>,
        y: RssArray<'a>,
    ) -> Result<Self> {
        let expected = flux.shape();
        for (name, array) in [("ivar", &ivar), ("x", &x), ("y", &y)] {
            if array.shape() != expected {
                return Err(Error::ShapeMismatch {
                    array: name,
                    expected,
                    actual: array.shape(),
                });
            }
        }
        Ok(Self { flux, ivar, x, y })
    }

    /// Convenience constructor over flat channel-major slices.
    pub fn from_slices(
        flux: &'a [f64],
        ivar: &'a [f64],
        x: &'a [f64],
        y: &'a [f64],
        channels: usize,
        fibers: usize,
    ) -> Result<Self> {
        let wrap = |name: &'static str, data: &'a [f64]| {
            RssArray::new(data, channels, fibers).map_err(|e| match e {
                Error::ShapeMismatch {
                    expected, actual, ..
                } => Error::ShapeMismatch {
                    array: name,
                    expected,
                    actual,
                },
                other => other,
            })
        };
        Self::new(
            wrap("flux", flux)?,
            wrap("ivar", ivar)?,
            wrap("x", x)?,
            wrap("y", y)?,
        )
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.flux.channels
    }

    #[inline]
    pub fn fibers(&self) -> usize {
        self.flux.fibers
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> ChannelSlice<'a> {
        ChannelSlice {
            flux: self.flux.channel(channel),
            ivar: self.ivar.channel(channel),
            x: self.x.channel(channel),
            y: self.y.channel(channel),
        }
    }

    /// Mean of every finite `(x, y)` pair across all channels, in input order.
    ///
    /// Returns `None` when no position is finite.
    pub fn position_centroid(&self) -> Option<DVec2> {
        let finite = || {
            self.x
                .data
                .iter()
                .zip(self.y.data)
                .filter(|(x, y)| x.is_measured() && y.is_measured())
                .map(|(&x, &y)| DVec2::new(x, y))
        };
        let count = finite().count();
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let mean = finite().sum::<DVec2>() / n;
        if mean.is_finite() {
            return Some(mean);
        }
        // The plain sum overflowed; divide first
        Some(finite().map(|p| p / n).sum())
    }

    /// Number of samples that may contribute weight, over all channels.
    pub fn usable_count(&self) -> usize {
        (0..self.channels())
            .map(|c| self.channel(c).usable_indices().count())
            .sum()
    }
}
