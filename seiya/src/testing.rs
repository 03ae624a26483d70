//! Synthetic fiber-bundle data for tests.

use glam::DVec2;

/// Fiber positions of a hexagonal bundle with `rings` rings around a central
/// fiber, neighbors `pitch` apart, centered on the origin.
///
/// Yields `1 + 3 * rings * (rings + 1)` positions: 7 for one ring, 19 for two,
/// 127 for six. Order is the center first, then ring by ring.
pub fn hex_bundle(rings: i32, pitch: f64) -> Vec<DVec2> {
    let mut positions = vec![DVec2::ZERO];
    let q_axis = DVec2::new(pitch, 0.0);
    let r_axis = DVec2::new(pitch * 0.5, pitch * 3.0f64.sqrt() * 0.5);
    for ring in 1..=rings {
        for q in -ring..=ring {
            for r in (-ring).max(-q - ring)..=ring.min(-q + ring) {
                let s = -q - r;
                if q.abs().max(r.abs()).max(s.abs()) == ring {
                    positions.push(q_axis * q as f64 + r_axis * r as f64);
                }
            }
        }
    }
    positions
}

/// Channel-major `[channels][fibers]` planes repeating `positions` for every
/// channel, with constant flux and ivar.
pub struct UniformExposure {
    pub channels: usize,
    pub fibers: usize,
    pub flux: Vec<f64>,
    pub ivar: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl UniformExposure {
    pub fn new(positions: &[DVec2], channels: usize, flux: f64, ivar: f64) -> Self {
        let fibers = positions.len();
        let repeat = |f: fn(&DVec2) -> f64| -> Vec<f64> {
            (0..channels)
                .flat_map(|_| positions.iter().map(f))
                .collect()
        };
        Self {
            channels,
            fibers,
            flux: vec![flux; channels * fibers],
            ivar: vec![ivar; channels * fibers],
            x: repeat(|p| p.x),
            y: repeat(|p| p.y),
        }
    }

    /// Flat index of `(channel, fiber)`.
    pub fn at(&self, channel: usize, fiber: usize) -> usize {
        channel * self.fibers + fiber
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bundle_sizes() {
        assert_eq!(hex_bundle(0, 2.5).len(), 1);
        assert_eq!(hex_bundle(1, 2.5).len(), 7);
        assert_eq!(hex_bundle(2, 2.5).len(), 19);
        assert_eq!(hex_bundle(6, 2.5).len(), 127);
    }

    #[test]
    fn test_hex_bundle_first_ring_at_pitch() {
        let bundle = hex_bundle(1, 2.5);
        assert_eq!(bundle[0], DVec2::ZERO);
        for p in &bundle[1..] {
            assert!((p.length() - 2.5).abs() < 1e-12);
        }
        let centroid = bundle.iter().copied().sum::<DVec2>() / bundle.len() as f64;
        assert!(centroid.length() < 1e-12);
    }
}
