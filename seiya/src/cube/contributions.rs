//! Per-channel map from output cells to the samples that feed them.

use glam::DVec2;

use crate::cube::grid::GridGeometry;
use crate::cube::spatial::SampleIndex;
use crate::samples::ChannelSlice;

/// One sample's spatial weight toward one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub sample: usize,
    pub weight: f64,
}

/// Row-major cell → contribution lists, stored CSR-style.
///
/// Each list is sorted by ascending sample index, which fixes the floating-point
/// summation order of every cell independent of how the lookup was done.
#[derive(Debug)]
pub struct ContributionMap {
    starts: Vec<usize>,
    entries: Vec<Contribution>,
}

impl ContributionMap {
    /// Collect, for every cell of `geometry`, the usable samples of `slice`
    /// whose distance to the cell center is at most `radius` and whose kernel
    /// weight is positive.
    pub fn build(
        slice: &ChannelSlice<'_>,
        geometry: &GridGeometry,
        radius: f64,
        kernel_fn: impl Fn(f64) -> f64,
    ) -> Self {
        let points: Vec<(usize, DVec2)> = slice
            .usable_indices()
            .map(|i| (i, slice.sample(i).position()))
            .collect();
        let index = SampleIndex::build(&points, radius);

        let shape = geometry.shape();
        let mut starts = Vec::with_capacity(shape.cells() + 1);
        let mut entries = Vec::new();
        let mut candidates = Vec::new();
        starts.push(0);

        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                let center = geometry.cell_center(row, col);
                candidates.clear();
                index.query(center, radius, &mut candidates);
                candidates.sort_unstable();

                for &sample in &candidates {
                    let distance = slice.sample(sample).position().distance(center);
                    if distance > radius {
                        continue;
                    }
                    let weight = kernel_fn(distance);
                    if weight > 0.0 {
                        entries.push(Contribution { sample, weight });
                    }
                }
                starts.push(entries.len());
            }
        }

        tracing::trace!(
            indexed = index.len(),
            contributions = entries.len(),
            "Built contribution map"
        );

        Self { starts, entries }
    }

    /// Number of cells covered by the map.
    #[inline]
    pub fn cells(&self) -> usize {
        self.starts.len() - 1
    }

    /// Contributions to the cell at row-major `offset`.
    #[inline]
    pub fn cell(&self, offset: usize) -> &[Contribution] {
        &self.entries[self.starts[offset]..self.starts[offset + 1]]
    }

    /// Total number of (cell, sample) pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
