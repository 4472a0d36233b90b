//! Overflow-safe complex helpers shared by the kernels.

use num_complex::Complex;

use crate::machine::BesselFloat;

/// `s * a + b` on complex values, using [`BesselFloat::fma`] per component.
#[inline]
pub(crate) fn mul_add<T: BesselFloat>(s: Complex<T>, a: Complex<T>, b: Complex<T>) -> Complex<T> {
    Complex::new(
        s.re.fma(a.re, b.re) - s.im * a.im,
        s.re.fma(a.im, s.im.fma(a.re, b.im)),
    )
}

/// `s * a + b` with a real multiplier.
#[inline]
pub(crate) fn mul_add_real<T: BesselFloat>(s: Complex<T>, a: T, b: Complex<T>) -> Complex<T> {
    Complex::new(s.re.fma(a, b.re), s.im.fma(a, b.im))
}

/// |z| without squaring the larger component.
#[inline]
pub(crate) fn modulus<T: BesselFloat>(z: Complex<T>) -> T {
    let (a, b) = (z.re.abs(), z.im.abs());
    let (big, small) = if a > b { (a, b) } else { (b, a) };
    if big == T::zero() {
        return T::zero();
    }
    let q = small / big;
    big * (T::one() + q * q).sqrt()
}

/// `a / b`, normalizing `b` by its modulus first.
#[inline]
pub(crate) fn quotient<T: BesselFloat>(a: Complex<T>, b: Complex<T>) -> Complex<T> {
    let bm = T::one() / modulus(b);
    let (c, d) = (b.re * bm, b.im * bm);
    Complex::new((a.re * c + a.im * d) * bm, (a.im * c - a.re * d) * bm)
}

/// `2 / z`, the step of every three-term Bessel recurrence.
#[inline]
pub(crate) fn two_over<T: BesselFloat>(z: Complex<T>) -> Complex<T> {
    let raz = T::one() / modulus(z);
    let re = z.re * raz;
    let im = -z.im * raz;
    Complex::new((re + re) * raz, (im + im) * raz)
}

/// `e^{iθ}`.
#[inline]
pub(crate) fn cis<T: BesselFloat>(theta: T) -> Complex<T> {
    Complex::new(theta.cos(), theta.sin())
}

/// `e^{iπνs}` for `s = ±1`, with the integer part of ν folded into a sign
/// so that large orders do not lose the fractional phase.
#[inline]
pub(crate) fn half_turns<T: BesselFloat>(nu: T, sign: T) -> Complex<T> {
    let whole = nu.trunc_i32();
    let frac = nu - T::from_f64(f64::from(whole));
    let c = cis(frac * sign * T::from_f64(crate::algo::thresholds::PI));
    if whole % 2 != 0 {
        -c
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::{Complex32, Complex64};

    #[test]
    fn modulus_basics() {
        assert_eq!(modulus(Complex64::new(0.0, 0.0)), 0.0);
        assert!((modulus(Complex64::new(3.0, -4.0)) - 5.0).abs() < 1e-15);
        assert!((modulus(Complex64::new(0.0, 4.0)) - 4.0).abs() < 1e-15);
        assert!((modulus(Complex32::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn modulus_avoids_overflow_and_underflow() {
        let big = 1.0e154;
        let r = modulus(Complex64::new(big, big));
        assert!((r / (big * 2.0_f64.sqrt()) - 1.0).abs() < 1e-15);

        let tiny = 1.0e-308;
        let r = modulus(Complex64::new(tiny, tiny));
        assert!(r > 0.0);
    }

    #[test]
    fn quotient_matches_division() {
        let a = Complex64::new(3.0, 4.0);
        let b = Complex64::new(1.0, 2.0);
        let c = quotient(a, b);
        assert!((c.re - 2.2).abs() < 1e-14);
        assert!((c.im + 0.4).abs() < 1e-14);

        let c = quotient(Complex64::new(1.0, 1.0), Complex64::new(1.0e200, 1.0e200));
        assert!((c.re / 1.0e-200 - 1.0).abs() < 1e-14);
    }

    #[test]
    fn two_over_is_reciprocal() {
        let z = Complex64::new(0.3, -1.7);
        let r = two_over(z) * z;
        assert!((r.re - 2.0).abs() < 1e-14);
        assert!(r.im.abs() < 1e-14);
    }

    #[test]
    fn half_turns_folds_integer_part() {
        let c = half_turns(2.5_f64, 1.0);
        assert!(c.re.abs() < 1e-15);
        assert!((c.im - 1.0).abs() < 1e-15);
        let c = half_turns(1.0_f64, -1.0);
        assert!((c.re + 1.0).abs() < 1e-15);
    }

    #[test]
    fn mul_add_agrees_with_plain_arithmetic() {
        let s = Complex64::new(1.5, -0.5);
        let a = Complex64::new(-2.0, 0.25);
        let b = Complex64::new(0.125, 3.0);
        let d = mul_add(s, a, b) - (s * a + b);
        assert!(d.norm() < 1e-14);
        let d = mul_add_real(s, 2.0, b) - (s * 2.0 + b);
        assert!(d.norm() < 1e-14);
    }
}
