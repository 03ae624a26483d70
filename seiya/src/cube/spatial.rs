//! Grid-bucketed index of sample positions for radius queries.
//!
//! Samples are binned into square buckets at least one query radius wide, so a
//! radius query touches at most a 3x3 block of buckets in the common case.
//! Buckets are stored CSR-style and keep samples in insertion order.

use glam::DVec2;

/// Upper bound on buckets per indexed sample. Widely scattered positions with a
/// tiny radius would otherwise allocate a mostly empty bucket grid.
const MAX_BUCKETS_PER_SAMPLE: usize = 4;

#[derive(Debug)]
pub(crate) struct SampleIndex {
    min: DVec2,
    bucket_size: f64,
    nx: usize,
    ny: usize,
    /// `starts[b]..starts[b + 1]` is the range of bucket `b` in `entries`.
    starts: Vec<usize>,
    entries: Vec<usize>,
}

impl SampleIndex {
    /// Build from `(sample_index, position)` pairs with finite positions.
    pub fn build(points: &[(usize, DVec2)], radius: f64) -> Self {
        if points.is_empty() {
            return Self {
                min: DVec2::ZERO,
                bucket_size: radius.max(f64::MIN_POSITIVE),
                nx: 0,
                ny: 0,
                starts: vec![0],
                entries: Vec::new(),
            };
        }

        let (min, max) = points.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(lo, hi), &(_, p)| (lo.min(p), hi.max(p)),
        );
        // Halved so that finite positions at opposite ends of the f64 range
        // still give a finite extent
        let half_extent = max * 0.5 - min * 0.5;

        // Bucket counts are sized in f64 and only cast once they fit the cap
        let max_buckets = (points.len() * MAX_BUCKETS_PER_SAMPLE).max(16);
        let buckets_along = |size: f64| (half_extent / (size * 0.5)).floor() + 1.0;
        let mut bucket_size = radius.max(f64::MIN_POSITIVE);
        let mut counts = buckets_along(bucket_size);
        while counts.x * counts.y > max_buckets as f64 && bucket_size < f64::MAX {
            bucket_size *= 2.0;
            counts = buckets_along(bucket_size);
        }
        let nx = (counts.x as usize).clamp(1, max_buckets);
        let ny = (counts.y as usize).clamp(1, max_buckets);

        let mut index = Self {
            min,
            bucket_size,
            nx,
            ny,
            starts: Vec::new(),
            entries: Vec::new(),
        };
        let bucket_of = |p: DVec2| -> usize {
            let cell = index.bucket_coords(p);
            let bx = (cell.x as usize).min(nx - 1);
            let by = (cell.y as usize).min(ny - 1);
            by * nx + bx
        };

        // Counting sort keeps insertion order within each bucket
        let mut starts = vec![0usize; nx * ny + 1];
        for &(_, p) in points {
            starts[bucket_of(p) + 1] += 1;
        }
        for b in 0..nx * ny {
            starts[b + 1] += starts[b];
        }
        let mut cursor = starts.clone();
        let mut entries = vec![0usize; points.len()];
        for &(sample, p) in points {
            let b = bucket_of(p);
            entries[cursor[b]] = sample;
            cursor[b] += 1;
        }

        index.starts = starts;
        index.entries = entries;
        index
    }

    /// Fractional bucket coordinates of `p`, computed on halved values so the
    /// offset from `min` cannot overflow.
    #[inline]
    fn bucket_coords(&self, p: DVec2) -> DVec2 {
        ((p * 0.5 - self.min * 0.5) / (self.bucket_size * 0.5)).floor()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append every indexed sample whose bucket intersects the square of
    /// half-width `radius` around `center`. A superset of the samples within
    /// `radius`; callers filter by exact distance.
    pub fn query(&self, center: DVec2, radius: f64, out: &mut Vec<usize>) {
        if self.entries.is_empty() {
            return;
        }
        let lo = self.bucket_coords(center - radius);
        let hi = self.bucket_coords(center + radius);
        if hi.x < 0.0 || hi.y < 0.0 || lo.x >= self.nx as f64 || lo.y >= self.ny as f64 {
            return;
        }
        // Casts saturate; clamp to the grid
        let x0 = (lo.x.max(0.0) as usize).min(self.nx - 1);
        let y0 = (lo.y.max(0.0) as usize).min(self.ny - 1);
        let x1 = (hi.x.max(0.0) as usize).min(self.nx - 1);
        let y1 = (hi.y.max(0.0) as usize).min(self.ny - 1);

        for by in y0..=y1 {
            let row = by * self.nx;
            let start = self.starts[row + x0];
            let end = self.starts[row + x1 + 1];
            out.extend_from_slice(&self.entries[start..end]);
        }
    }
}
