//! Ratios `I_{ν+k+1}(z) / I_{ν+k}(z)` by backward recurrence.
//!
//! The start index comes from the forward-recurrence bound of Sookne
//! (J. Res. NBS 77B, 1973): run the recurrence for the ratio's denominator
//! upward until it exceeds a tolerance-derived test twice, tightening the
//! test once in between.

use alloc::vec;
use alloc::vec::Vec;

use num_complex::Complex;

use crate::algo::thresholds::SQRT_2;
use crate::machine::BesselFloat;
use crate::utils::{modulus, mul_add, quotient, two_over};

/// `n` ratios starting at order `fnu`; `z` must be nonzero.
pub(crate) fn i_ratios<T: BesselFloat>(z: Complex<T>, fnu: T, n: usize, tol: T) -> Vec<Complex<T>> {
    let zero = T::zero();
    let one = T::one();
    let cone = Complex::new(one, zero);

    let az = modulus(z);
    let inu = fnu.trunc_i32();
    let idnu = inu + n as i32 - 1;
    let magz = az.trunc_i32();
    let amagz = T::from_f64(f64::from(magz + 1));
    let fnup = amagz.max(T::from_f64(f64::from(idnu)));
    let id = (idnu - magz - 1).min(0);
    let rz = two_over(z);

    let mut t1 = rz * fnup;
    let mut p2 = -t1;
    let mut p1 = cone;
    t1 = t1 + rz;

    let mut ap2 = modulus(p2);
    let ap1 = modulus(p1);
    let test1 = ((ap2 + ap2) / (ap1 * tol)).sqrt();
    let mut test = test1;
    let rap1 = one / ap1;
    p1 = p1 * rap1;
    p2 = p2 * rap1;
    ap2 = ap2 * rap1;

    let mut k: i32 = 1;
    let mut tightened = false;
    loop {
        k += 1;
        let ap1 = ap2;
        let pt = p2;
        p2 = mul_add(-t1, pt, p1);
        p1 = pt;
        t1 = t1 + rz;
        ap2 = modulus(p2);
        if ap1 <= test {
            continue;
        }
        if tightened {
            break;
        }
        let ak = modulus(t1) * T::from_f64(0.5);
        let flam = ak + (ak * ak - one).sqrt();
        let rho = (ap2 / ap1).min(flam);
        test = test1 * (rho / (rho * rho - one)).sqrt();
        tightened = true;
    }

    let kk = (k + 1 - id) as usize;
    let dfnu = fnu + T::from_f64((n - 1) as f64);
    let mut p1 = Complex::new(one / ap2, zero);
    let mut p2 = Complex::new(zero, zero);
    let mut t = T::from_f64(kk as f64);
    for _ in 0..kk {
        let pt = p1;
        p1 = mul_add(pt, rz * (dfnu + t), p2);
        p2 = pt;
        t = t - one;
    }
    if p1.re == zero && p1.im == zero {
        p1 = Complex::new(tol, tol);
    }

    let mut cy = vec![Complex::new(zero, zero); n];
    cy[n - 1] = quotient(p2, p1);

    let cdfnu = rz * fnu;
    for k in (0..n - 1).rev() {
        let mut pt = cdfnu + rz * T::from_f64((k + 1) as f64) + cy[k + 1];
        let mut ak = modulus(pt);
        if ak == zero {
            pt = Complex::new(tol, tol);
            ak = tol * T::from_f64(SQRT_2);
        }
        let rak = one / ak;
        cy[k] = Complex::new(rak * pt.re * rak, -rak * pt.im * rak);
    }
    cy
}
