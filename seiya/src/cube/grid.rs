//! Output grid shape and sky geometry.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spatial extent `(rows, cols)` of every channel plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

impl GridShape {
    /// Fails with [`Error::UnsupportedShape`] unless both extents are positive.
    pub fn new(rows: isize, cols: isize) -> Result<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(Error::UnsupportedShape { rows, cols });
        }
        Ok(Self {
            rows: rows as usize,
            cols: cols as usize,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

impl TryFrom<(isize, isize)> for GridShape {
    type Error = Error;

    fn try_from((rows, cols): (isize, isize)) -> Result<Self> {
        Self::new(rows, cols)
    }
}

/// Where the grid center sits on the sky.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridOrigin {
    /// Mean of all finite sample positions across every channel.
    #[default]
    Centroid,
    /// Caller-defined sky position.
    Fixed { x: f64, y: f64 },
}

/// Resolved mapping between cell indices and sky positions.
///
/// Cell `(row, col)` is centered at
/// `origin + ((col - (cols-1)/2), (row - (rows-1)/2)) * pixel_scale`, so the
/// grid is centered on `origin`. Columns run along +x, rows along +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    shape: GridShape,
    pixel_scale: f64,
    origin: DVec2,
}

impl GridGeometry {
    pub fn new(shape: GridShape, pixel_scale: f64, origin: DVec2) -> Self {
        debug_assert!(pixel_scale > 0.0);
        Self {
            shape,
            pixel_scale,
            origin,
        }
    }

    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[inline]
    pub fn pixel_scale(&self) -> f64 {
        self.pixel_scale
    }

    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Sky position of the center of cell `(row, col)`.
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> DVec2 {
        let half = DVec2::new(
            (self.shape.cols as f64 - 1.0) * 0.5,
            (self.shape.rows as f64 - 1.0) * 0.5,
        );
        self.origin + (DVec2::new(col as f64, row as f64) - half) * self.pixel_scale
    }

    /// Cell whose center is closest to `position`, if it lies on the grid.
    pub fn nearest_cell(&self, position: DVec2) -> Option<(usize, usize)> {
        let half = DVec2::new(
            (self.shape.cols as f64 - 1.0) * 0.5,
            (self.shape.rows as f64 - 1.0) * 0.5,
        );
        let fractional = (position - self.origin) / self.pixel_scale + half;
        let col = fractional.x.round();
        let row = fractional.y.round();
        let in_range = |v: f64, n: usize| v >= 0.0 && v < n as f64;
        (in_range(col, self.shape.cols) && in_range(row, self.shape.rows))
            .then_some((row as usize, col as usize))
    }
}
