//! Seiya - datacube reconstruction for fiber-bundle integral field spectroscopy.
//!
//! Row-stacked spectra (RSS) give, per spectral channel, one flux and
//! inverse-variance value per fiber at an arbitrary sky position. This library
//! resamples those scattered samples onto a regular spatial grid, channel by
//! channel, and propagates inverse variance alongside.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seiya::{cubify, CubeConfig, RssArray};
//!
//! let flux = RssArray::new(&flux_data, channels, fibers)?;
//! let ivar = RssArray::new(&ivar_data, channels, fibers)?;
//! let x = RssArray::new(&xpos_data, channels, fibers)?;
//! let y = RssArray::new(&ypos_data, channels, fibers)?;
//!
//! let cube = cubify(flux, ivar, x, y, (34, 34), &CubeConfig::default())?;
//! println!("cube shape {:?}", cube.shape());
//! ```

pub mod byte_order;
pub mod cube;
mod error;
pub mod ifu;
pub mod rss;
mod samples;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Core reconstruction
// ============================================================================

pub use cube::{
    // Results
    Cube,
    // Configuration
    CubeConfig,
    GridGeometry,
    GridOrigin,
    GridShape,
    ResampleKernel,
    // Main API
    cubify,
    reconstruct,
};
pub use samples::{ChannelSlice, RssArray, RssSamples, Sample};

// ============================================================================
// Collaborators
// ============================================================================

pub use byte_order::ByteOrder;
pub use ifu::IfuDesign;
pub use rss::RssExposure;

pub use error::{Error, Result};
