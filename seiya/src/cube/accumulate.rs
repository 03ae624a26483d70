//! Flux and inverse-variance accumulation for a single output cell.
//!
//! Flux is the inverse-variance weighted mean re-weighted by the spatial
//! kernel weight `w`:
//!
//! ```text
//! flux = Σ w·ivar·flux / Σ w·ivar
//! ```
//!
//! Inverse variance follows the independence law:
//!
//! ```text
//! ivar = Σ w²·ivar
//! ```
//!
//! It is non-decreasing in every sample's ivar and exactly zero when no sample
//! contributes.
//!
//! Sample ivars are divided by a power-of-two scale (see [`ivar_scale`]) before
//! summing and the result is multiplied back. The division is exact, so sums
//! that fit in f64 are bit-identical to unscaled ones. Sums that would overflow
//! keep a finite flux; ivar saturates to infinity only when the true value
//! exceeds `f64::MAX`.

/// Largest power of two not above `max_ivar`, or 1.0 when `max_ivar` is not a
/// positive normal number.
pub fn ivar_scale(max_ivar: f64) -> f64 {
    if !max_ivar.is_normal() || max_ivar < 0.0 {
        return 1.0;
    }
    f64::from_bits(max_ivar.to_bits() & 0x7ff0_0000_0000_0000)
}

/// Running sums for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAccumulator {
    weighted_flux: f64,
    weight: f64,
    weight_sq: f64,
    count: usize,
    scale: f64,
}

impl Default for CellAccumulator {
    fn default() -> Self {
        Self::with_ivar_scale(1.0)
    }
}

impl CellAccumulator {
    /// Accumulator whose inputs are divided by `scale`, normally
    /// [`ivar_scale`] of the channel's largest ivar.
    pub fn with_ivar_scale(scale: f64) -> Self {
        Self {
            weighted_flux: 0.0,
            weight: 0.0,
            weight_sq: 0.0,
            count: 0,
            scale,
        }
    }

    /// Add a usable sample with spatial weight `w > 0` and `ivar > 0`.
    #[inline]
    pub fn add(&mut self, w: f64, flux: f64, ivar: f64) {
        debug_assert!(w > 0.0 && ivar > 0.0);
        let wi = w * (ivar / self.scale);
        self.weighted_flux += wi * flux;
        self.weight += wi;
        self.weight_sq += w * wi;
        self.count += 1;
    }

    /// Number of samples added.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weight <= 0.0
    }

    /// Weighted mean flux, or `fill_value` for an empty cell.
    #[inline]
    pub fn flux(&self, fill_value: f64) -> f64 {
        if self.is_empty() {
            fill_value
        } else {
            self.weighted_flux / self.weight
        }
    }

    /// Propagated inverse variance; exactly `0.0` for an empty cell.
    #[inline]
    pub fn ivar(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.weight_sq * self.scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell() {
        let acc = CellAccumulator::default();
        assert!(acc.is_empty());
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.ivar(), 0.0);
        assert_eq!(acc.flux(0.0), 0.0);
        assert!(acc.flux(f64::NAN).is_nan());
    }

    #[test]
    fn test_single_sample_at_full_weight_passes_through() {
        let mut acc = CellAccumulator::default();
        acc.add(1.0, 3.5, 4.0);
        assert_eq!(acc.flux(0.0), 3.5);
        assert_eq!(acc.ivar(), 4.0);
    }

    #[test]
    fn test_inverse_variance_weighted_mean() {
        let mut acc = CellAccumulator::default();
        acc.add(1.0, 1.0, 1.0);
        acc.add(1.0, 4.0, 2.0);
        // (1*1 + 4*2) / (1 + 2) = 3
        assert!((acc.flux(0.0) - 3.0).abs() < 1e-12);
        assert!((acc.ivar() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_spatial_weight_scales_contribution() {
        let mut acc = CellAccumulator::default();
        acc.add(1.0, 0.0, 1.0);
        acc.add(0.5, 6.0, 1.0);
        // (0 + 0.5*6) / 1.5 = 2
        assert!((acc.flux(0.0) - 2.0).abs() < 1e-12);
        // 1 + 0.25
        assert!((acc.ivar() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_ivar_scale_is_power_of_two_below() {
        assert_eq!(ivar_scale(1.0), 1.0);
        assert_eq!(ivar_scale(3.0), 2.0);
        assert_eq!(ivar_scale(0.3), 0.25);
        assert_eq!(ivar_scale(f64::MAX), 2f64.powi(1023));
        for degenerate in [0.0, -4.0, f64::NAN, f64::INFINITY, 5e-324] {
            assert_eq!(ivar_scale(degenerate), 1.0);
        }
    }

    #[test]
    fn test_scaled_sums_match_unscaled() {
        let samples = [(1.0, 2.0, 3.0), (0.4, -1.5, 0.7), (0.05, 8.0, 12.0)];
        let mut plain = CellAccumulator::default();
        let mut scaled = CellAccumulator::with_ivar_scale(ivar_scale(12.0));
        for (w, flux, ivar) in samples {
            plain.add(w, flux, ivar);
            scaled.add(w, flux, ivar);
        }
        assert_eq!(plain.flux(0.0).to_bits(), scaled.flux(0.0).to_bits());
        assert_eq!(plain.ivar().to_bits(), scaled.ivar().to_bits());
    }

    #[test]
    fn test_huge_ivar_keeps_flux_finite() {
        let big = 6e307;
        let mut acc = CellAccumulator::with_ivar_scale(ivar_scale(big));
        acc.add(1.0, 2.0, big);
        acc.add(1.0, 2.0, big);
        assert_eq!(acc.flux(0.0), 2.0);
        assert_eq!(acc.ivar(), 2.0 * big);

        // Past f64::MAX only ivar saturates
        let mut acc = CellAccumulator::with_ivar_scale(ivar_scale(1e308));
        acc.add(1.0, 2.0, 1e308);
        acc.add(1.0, 2.0, 1e308);
        assert_eq!(acc.flux(0.0), 2.0);
        assert_eq!(acc.ivar(), f64::INFINITY);
    }

    #[test]
    fn test_ivar_non_decreasing_in_sample_ivar() {
        for base in [0.1, 1.0, 10.0, 100.0] {
            let mut prev = 0.0;
            for scale in 1..20 {
                let mut acc = CellAccumulator::default();
                acc.add(0.9, 1.0, base * scale as f64);
                acc.add(0.2, 5.0, 50.0);
                assert!(acc.ivar() >= prev);
                prev = acc.ivar();
            }
        }
    }
}
