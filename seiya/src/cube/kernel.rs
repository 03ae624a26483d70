//! Radially symmetric resampling kernels.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spatial weight applied to a sample as a function of its distance to a cell
/// center. Every variant peaks at 1.0 for distance 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResampleKernel {
    /// `exp(-d² / 2σ²)`.
    Gaussian { sigma: f64 },
    /// Overlap area of two fiber discs `d` apart, normalized by the disc area.
    /// Zero once `d >= 2 * fiber_radius`.
    Aperture { fiber_radius: f64 },
    /// Unit weight everywhere inside the cutoff radius.
    TopHat,
}

impl Default for ResampleKernel {
    fn default() -> Self {
        Self::Gaussian { sigma: 0.7 }
    }
}

impl ResampleKernel {
    /// Weight at `distance`. Prefer [`ResampleKernel::weight_fn`] in loops.
    pub fn weight(&self, distance: f64) -> f64 {
        match *self {
            Self::Gaussian { sigma } => gaussian_weight(distance, 1.0 / (2.0 * sigma * sigma)),
            Self::Aperture { fiber_radius } => aperture_weight(distance, fiber_radius),
            Self::TopHat => 1.0,
        }
    }

    /// Resolve the variant once into a plain weight function.
    pub fn weight_fn(&self) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
        match *self {
            Self::Gaussian { sigma } => {
                let inv_2sigma_sq = 1.0 / (2.0 * sigma * sigma);
                Box::new(move |d| gaussian_weight(d, inv_2sigma_sq))
            }
            Self::Aperture { fiber_radius } => Box::new(move |d| aperture_weight(d, fiber_radius)),
            Self::TopHat => Box::new(|_| 1.0),
        }
    }

    /// Distance beyond which the weight is identically zero, if finite.
    pub fn support(&self) -> Option<f64> {
        match *self {
            Self::Gaussian { .. } | Self::TopHat => None,
            Self::Aperture { fiber_radius } => Some(2.0 * fiber_radius),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Self::Gaussian { sigma } if !(sigma.is_finite() && sigma > 0.0) => Err(
                Error::InvalidConfig(format!("gaussian sigma must be positive, got {sigma}")),
            ),
            Self::Aperture { fiber_radius } if !(fiber_radius.is_finite() && fiber_radius > 0.0) => {
                Err(Error::InvalidConfig(format!(
                    "aperture fiber_radius must be positive, got {fiber_radius}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[inline]
fn gaussian_weight(distance: f64, inv_2sigma_sq: f64) -> f64 {
    (-distance * distance * inv_2sigma_sq).exp()
}

/// Lens area of two discs of radius `r` with centers `d` apart, over `πr²`.
#[inline]
fn aperture_weight(distance: f64, r: f64) -> f64 {
    let d = distance.abs();
    if d >= 2.0 * r {
        return 0.0;
    }
    let half = d / (2.0 * r);
    let lens = 2.0 * r * r * half.acos() - 0.5 * d * (4.0 * r * r - d * d).sqrt();
    (lens / (PI * r * r)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kernels_peak_at_one() {
        for kernel in [
            ResampleKernel::Gaussian { sigma: 0.7 },
            ResampleKernel::Aperture { fiber_radius: 1.0 },
            ResampleKernel::TopHat,
        ] {
            assert!((kernel.weight(0.0) - 1.0).abs() < 1e-12, "{kernel:?}");
        }
    }

    #[test]
    fn test_gaussian_half_maximum() {
        let sigma = 0.7;
        let kernel = ResampleKernel::Gaussian { sigma };
        let hwhm = sigma * (2.0 * 2.0f64.ln()).sqrt();
        assert!((kernel.weight(hwhm) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_monotone_decreasing() {
        let kernel = ResampleKernel::Gaussian { sigma: 1.0 };
        let mut prev = kernel.weight(0.0);
        for step in 1..50 {
            let w = kernel.weight(step as f64 * 0.1);
            assert!(w < prev);
            prev = w;
        }
    }

    #[test]
    fn test_aperture_overlap_values() {
        let kernel = ResampleKernel::Aperture { fiber_radius: 1.0 };
        // Discs touching: no overlap
        assert_eq!(kernel.weight(2.0), 0.0);
        assert_eq!(kernel.weight(3.0), 0.0);
        // Centers one radius apart: (2π/3 - √3/2) / π
        let expected = (2.0 * PI / 3.0 - 3.0f64.sqrt() / 2.0) / PI;
        assert!((kernel.weight(1.0) - expected).abs() < 1e-12);
        assert_eq!(kernel.support(), Some(2.0));
    }

    #[test]
    fn test_aperture_is_symmetric_in_sign() {
        let kernel = ResampleKernel::Aperture { fiber_radius: 1.0 };
        assert_eq!(kernel.weight(0.5), kernel.weight(-0.5));
    }

    #[test]
    fn test_weight_fn_matches_weight() {
        for kernel in [
            ResampleKernel::Gaussian { sigma: 0.7 },
            ResampleKernel::Aperture { fiber_radius: 1.0 },
            ResampleKernel::TopHat,
        ] {
            let f = kernel.weight_fn();
            for i in 0..30 {
                let d = i as f64 * 0.1;
                assert_eq!(f(d), kernel.weight(d), "{kernel:?} at {d}");
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(ResampleKernel::Gaussian { sigma: 0.0 }.validate().is_err());
        assert!(ResampleKernel::Gaussian { sigma: f64::NAN }
            .validate()
            .is_err());
        assert!(ResampleKernel::Aperture { fiber_radius: -1.0 }
            .validate()
            .is_err());
        assert!(ResampleKernel::TopHat.validate().is_ok());
        assert!(ResampleKernel::default().validate().is_ok());
    }
}
