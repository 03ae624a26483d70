pub trait FloatExt: Copy {
    fn approximately_eq(self, other: Self) -> bool;

    /// Neither NaN nor infinite.
    fn is_measured(self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < 1e-6
    }

    fn is_measured(self) -> bool {
        self.is_finite()
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn is_measured(self) -> bool {
        self.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_approximately_eq() {
        assert!(1.0_f64.approximately_eq(1.0));
        assert!((0.1_f64 + 0.2_f64).approximately_eq(0.3));
        assert!(!1.0_f64.approximately_eq(1.000001));
    }

    #[test]
    fn f32_uses_coarser_tolerance() {
        assert!(1.0_f32.approximately_eq(1.0000005));
        assert!(!1.0_f32.approximately_eq(1.001));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!f64::NAN.approximately_eq(f64::NAN));
        assert!(!f64::NAN.approximately_eq(0.0));
    }

    #[test]
    fn measured_rejects_nan_and_infinity() {
        assert!(0.0_f64.is_measured());
        assert!((-3.5_f64).is_measured());
        assert!(!f64::NAN.is_measured());
        assert!(!f64::INFINITY.is_measured());
        assert!(!f64::NEG_INFINITY.is_measured());
        assert!(!f32::NAN.is_measured());
    }
}
