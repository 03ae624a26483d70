//! Reconstruction parameters.

use serde::{Deserialize, Serialize};

use crate::cube::grid::GridOrigin;
use crate::cube::kernel::ResampleKernel;
use crate::error::{Error, Result};

/// Configuration for a single reconstruction call.
///
/// Distances (`pixel_scale`, `radius`, kernel widths) share the unit of the
/// input x/y positions, arcseconds for fiber-bundle RSS data.
///
/// # Examples
///
/// ```ignore
/// use seiya::{CubeConfig, ResampleKernel};
///
/// let config = CubeConfig::default()
///     .with_kernel(ResampleKernel::Aperture { fiber_radius: 1.0 })
///     .with_radius(2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Sky size of one output cell.
    pub pixel_scale: f64,
    /// Cutoff distance between a sample and a cell center.
    pub radius: f64,
    /// Spatial weighting function.
    pub kernel: ResampleKernel,
    /// Sky position of the grid center.
    pub origin: GridOrigin,
    /// Flux written to cells without any contributing sample. NaN allowed.
    pub fill_value: f64,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            pixel_scale: 0.5,
            radius: 1.6,
            kernel: ResampleKernel::Gaussian { sigma: 0.7 },
            origin: GridOrigin::Centroid,
            fill_value: 0.0,
        }
    }
}

impl CubeConfig {
    /// Gaussian kernel of width `sigma`, cut at the customary 1.6″ radius for
    /// 0.7″ and scaled proportionally otherwise.
    pub fn gaussian(sigma: f64) -> Self {
        Self {
            radius: sigma * (1.6 / 0.7),
            kernel: ResampleKernel::Gaussian { sigma },
            ..Default::default()
        }
    }

    /// Fiber-overlap kernel with the cutoff at the kernel's own support.
    pub fn aperture(fiber_radius: f64) -> Self {
        Self {
            radius: 2.0 * fiber_radius,
            kernel: ResampleKernel::Aperture { fiber_radius },
            ..Default::default()
        }
    }

    pub fn with_pixel_scale(mut self, pixel_scale: f64) -> Self {
        self.pixel_scale = pixel_scale;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_kernel(mut self, kernel: ResampleKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_origin(mut self, origin: GridOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = fill_value;
        self
    }

    /// Parse from YAML; missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "pixel_scale must be positive, got {}",
                self.pixel_scale
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if let GridOrigin::Fixed { x, y } = self.origin {
            if !(x.is_finite() && y.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "fixed origin must be finite, got ({x}, {y})"
                )));
            }
        }
        self.kernel.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_config_default() {
        let config = CubeConfig::default();
        assert!((config.pixel_scale - 0.5).abs() < f64::EPSILON);
        assert!((config.radius - 1.6).abs() < f64::EPSILON);
        assert_eq!(config.kernel, ResampleKernel::Gaussian { sigma: 0.7 });
        assert_eq!(config.origin, GridOrigin::Centroid);
        assert_eq!(config.fill_value, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cube_config_presets() {
        let gaussian = CubeConfig::gaussian(0.7);
        assert!((gaussian.radius - 1.6).abs() < 1e-12);

        let aperture = CubeConfig::aperture(1.0);
        assert_eq!(aperture.radius, 2.0);
        assert_eq!(
            aperture.kernel,
            ResampleKernel::Aperture { fiber_radius: 1.0 }
        );
    }

    #[test]
    fn test_cube_config_builder() {
        let config = CubeConfig::default()
            .with_pixel_scale(1.0)
            .with_radius(2.5)
            .with_kernel(ResampleKernel::TopHat)
            .with_origin(GridOrigin::Fixed { x: 1.0, y: -1.0 })
            .with_fill_value(f64::NAN);
        assert_eq!(config.pixel_scale, 1.0);
        assert_eq!(config.radius, 2.5);
        assert_eq!(config.kernel, ResampleKernel::TopHat);
        assert_eq!(config.origin, GridOrigin::Fixed { x: 1.0, y: -1.0 });
        assert!(config.fill_value.is_nan());
    }

    #[test]
    fn test_validate_rejects_non_positive_values() {
        assert!(CubeConfig::default().with_pixel_scale(0.0).validate().is_err());
        assert!(CubeConfig::default().with_radius(-1.0).validate().is_err());
        assert!(CubeConfig::default()
            .with_radius(f64::INFINITY)
            .validate()
            .is_err());
        assert!(CubeConfig::default()
            .with_origin(GridOrigin::Fixed {
                x: f64::NAN,
                y: 0.0
            })
            .validate()
            .is_err());
        let err = CubeConfig::default()
            .with_kernel(ResampleKernel::Gaussian { sigma: -0.1 })
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
pixel_scale: 1.0
radius: 2.0
kernel:
  type: aperture
  fiber_radius: 1.0
origin:
  type: fixed
  x: 0.5
  y: -0.5
fill_value: .nan
"#;
        let config = CubeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.pixel_scale, 1.0);
        assert_eq!(config.radius, 2.0);
        assert_eq!(
            config.kernel,
            ResampleKernel::Aperture { fiber_radius: 1.0 }
        );
        assert_eq!(config.origin, GridOrigin::Fixed { x: 0.5, y: -0.5 });
        assert!(config.fill_value.is_nan());
    }

    #[test]
    fn test_from_yaml_partial_uses_defaults() {
        let config = CubeConfig::from_yaml("kernel:\n  type: top_hat\n").unwrap();
        assert_eq!(config.kernel, ResampleKernel::TopHat);
        assert_eq!(config.pixel_scale, 0.5);
        assert_eq!(config.origin, GridOrigin::Centroid);
    }

    #[test]
    fn test_from_yaml_rejects_invalid_values() {
        let err = CubeConfig::from_yaml("radius: 0.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = CubeConfig::from_yaml("kernel:\n  type: lanczos\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
