//! Machine characteristics and the per-call scale limits derived from them.
//!
//! The constants mirror the I1MACH/D1MACH queries of TOMS 644; the derived
//! limits are recomputed from the same formulas so that `f32` and `f64`
//! share one code path.

use num_traits::Float;

use crate::algo::thresholds::{ASCLE_FACTOR, ELIM_LN10, LOG10_2, PRECISION_DIGITS_CAP};

/// Floating-point type usable by the Airy and Bessel kernels.
///
/// Implemented for `f64` (the reference precision) and `f32`.
pub trait BesselFloat: Float + core::fmt::Debug + Send + Sync + 'static {
    /// Machine epsilon.
    const MACH_EPSILON: Self;
    /// Smallest positive normal number.
    const MACH_TINY: Self;
    /// Largest finite number.
    const MACH_HUGE: Self;
    /// Binary digits in the significand, including the hidden bit.
    const MACH_DIGITS: i32;
    /// Minimum binary exponent.
    const MACH_MIN_EXP: i32;
    /// Maximum binary exponent.
    const MACH_MAX_EXP: i32;

    /// Lossless (f64) or rounding (f32) conversion of an algorithm constant.
    fn from_f64(x: f64) -> Self;

    /// `self * a + b`, fused when `std` provides a hardware FMA.
    fn fma(self, a: Self, b: Self) -> Self;

    /// Truncating conversion to `i32` for indices and loop counts.
    ///
    /// Callers only pass finite values already bounded by range checks, so
    /// the saturating `as` cast never actually saturates.
    #[inline]
    fn trunc_i32(self) -> i32 {
        self.to_f64().map_or(0, |v| v as i32)
    }
}

macro_rules! impl_bessel_float {
    ($t:ty, eps = $eps:expr, tiny = $tiny:expr, huge = $huge:expr,
     digits = $digits:expr, min_exp = $min:expr, max_exp = $max:expr) => {
        impl BesselFloat for $t {
            const MACH_EPSILON: $t = $eps;
            const MACH_TINY: $t = $tiny;
            const MACH_HUGE: $t = $huge;
            const MACH_DIGITS: i32 = $digits;
            const MACH_MIN_EXP: i32 = $min;
            const MACH_MAX_EXP: i32 = $max;

            #[inline]
            fn from_f64(x: f64) -> $t {
                x as $t
            }

            #[cfg(feature = "std")]
            #[inline]
            fn fma(self, a: $t, b: $t) -> $t {
                Float::mul_add(self, a, b)
            }

            #[cfg(not(feature = "std"))]
            #[inline]
            fn fma(self, a: $t, b: $t) -> $t {
                self * a + b
            }
        }
    };
}

impl_bessel_float!(
    f64,
    eps = f64::EPSILON,
    tiny = f64::MIN_POSITIVE,
    huge = f64::MAX,
    digits = 53,
    min_exp = -1021,
    max_exp = 1024
);

impl_bessel_float!(
    f32,
    eps = f32::EPSILON,
    tiny = f32::MIN_POSITIVE,
    huge = f32::MAX,
    digits = 24,
    min_exp = -125,
    max_exp = 128
);

/// Scale parameters shared by every evaluator in one call.
///
/// Built once by the public entry points and passed down by reference;
/// nothing below the entry point recomputes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits<T> {
    /// Relative accuracy floor, `max(ε, 1e-18)`.
    pub tol: T,
    /// Largest exponent magnitude before `exp` under/overflows.
    pub elim: T,
    /// `elim` reduced by the significand width; above it results are scaled.
    pub alim: T,
    /// Magnitudes at or below this are treated as underflowed.
    pub ascle: T,
    /// Lower bound on |z| for the large-argument asymptotic expansion.
    pub rl: T,
    /// Order beyond which only uniform (large-order) expansions are accurate.
    pub fnul: T,
}

impl<T: BesselFloat> Limits<T> {
    /// Derive the limits for `T` from its machine characteristics.
    pub fn machine() -> Self {
        let tol = T::MACH_EPSILON.max(T::from_f64(1.0e-18));
        let k = T::MACH_MIN_EXP.abs().min(T::MACH_MAX_EXP);
        let elim = ELIM_LN10 * (f64::from(k) * LOG10_2 - 3.0);

        let decimal = LOG10_2 * f64::from(T::MACH_DIGITS - 1);
        let dig = decimal.min(PRECISION_DIGITS_CAP);
        let alim = elim + (-(ELIM_LN10 * decimal)).max(-41.45);

        Limits {
            tol,
            elim: T::from_f64(elim),
            alim: T::from_f64(alim),
            ascle: T::from_f64(ASCLE_FACTOR) * T::MACH_TINY / tol,
            rl: T::from_f64(1.2 * dig + 3.0),
            fnul: T::from_f64(10.0 + 6.0 * (dig - 3.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_limits_match_published_values() {
        let lim = Limits::<f64>::machine();
        assert_eq!(lim.tol, f64::EPSILON);
        assert!((lim.elim - 700.9217936944459).abs() < 1e-10);
        assert!((lim.alim - 664.8716455337102).abs() < 1e-10);
        assert!((lim.rl - 21.784271729432426).abs() < 1e-12);
        assert!((lim.fnul - 85.92135864716212).abs() < 1e-12);
        assert!(lim.alim <= lim.elim);
    }

    #[test]
    fn f32_limits_are_ordered() {
        let lim = Limits::<f32>::machine();
        assert_eq!(lim.tol, f32::EPSILON);
        assert!((lim.elim - 79.750_01).abs() < 1e-3);
        assert!(lim.alim < lim.elim);
        assert!(lim.ascle > 0.0);
    }

    #[test]
    fn trunc_i32_truncates_toward_zero() {
        assert_eq!(3.9_f64.trunc_i32(), 3);
        assert_eq!((-2.5_f64).trunc_i32(), -2);
        assert_eq!(7.0_f32.trunc_i32(), 7);
    }
}
