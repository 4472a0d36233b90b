//! Analytic continuation of K into the left half plane.
//!
//! With `zn = -z` in the right half plane and `m = ±1`,
//!
//! `K_ν(z) = K_ν(zn e^{iπm}) = e^{-iπmν} K_ν(zn) - iπm I_ν(zn)`.
//!
//! `I` comes from the principal-sector dispatcher and the K pair from the K
//! kernel; higher K orders are carried by the forward recurrence on the same
//! three scale levels as the kernel. In scaled mode the two parts carry
//! different exponential factors and every order goes through the
//! combiner first.

use alloc::vec::Vec;

use num_complex::Complex;

use crate::algo::bessel_i::bessel_i;
use crate::algo::bessel_k::{bessel_k, ScaleLevels};
use crate::algo::combine::combine;
use crate::algo::thresholds::PI;
use crate::algo::Evaluation;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Error, Scaling};
use crate::utils::{cis, half_turns, modulus, two_over};

/// Direction of the half turn that carries `-z` onto `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    /// `m = -1`, for `Im z < 0`.
    Clockwise,
    /// `m = +1`.
    CounterClockwise,
}

impl Rotation {
    /// The rotation that reaches `z` from `-z` without crossing the cut.
    pub(crate) fn toward<T: BesselFloat>(z: Complex<T>) -> Self {
        if z.im < T::zero() {
            Rotation::Clockwise
        } else {
            Rotation::CounterClockwise
        }
    }

    fn sign<T: BesselFloat>(self) -> T {
        match self {
            Rotation::Clockwise => -T::one(),
            Rotation::CounterClockwise => T::one(),
        }
    }
}

/// Consecutive combiner rescales after which the K recurrence is restarted
/// from the combined values.
const RESTART_AFTER: i32 = 3;

/// `K_{fnu+k}(z)`, `k = 0..n`, for `Re z < 0`.
///
/// The underflow count is the number of orders whose two parts both fell
/// below the underflow floor in scaled mode. An underflow in the K pair
/// itself means the continuation cannot be formed and is an `Overflow`.
pub(crate) fn continue_k<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    rotation: Rotation,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let zn = -z;
    let i_part = bessel_i(zn, fnu, scaling, n, lim)?;
    let k_pair = bessel_k(zn, fnu, scaling, n.min(2), lim)?;
    if k_pair.underflow != 0 {
        tracing::debug!(underflow = k_pair.underflow, "continuation: K pair underflowed");
        return Err(Error::Overflow);
    }

    let sgn = -rotation.sign::<T>() * T::from_f64(PI);
    let mut csgn = Complex::new(T::zero(), sgn);
    if scaling == Scaling::Exponential {
        csgn = csgn * cis(-zn.im);
    }
    let mut cspn = half_turns(fnu, -rotation.sign::<T>());

    let scaled = scaling == Scaling::Exponential;
    let mut rescaled = 0;
    let mut underflow = 0;
    let mut kept = [Complex::new(T::zero(), T::zero()); 2];
    let mut y: Vec<Complex<T>> = i_part.values;

    for (i, &k) in k_pair.values.iter().enumerate() {
        let (mut c1, mut c2) = (k, y[i]);
        if scaled {
            let c = combine(zn, c1, c2, lim.ascle, lim.alim, &mut rescaled);
            c1 = c.s1;
            c2 = c.s2;
            underflow += usize::from(c.underflow);
            kept[i] = c1;
        }
        y[i] = cspn * c1 + csgn * c2;
        cspn = -cspn;
    }
    if n <= 2 {
        return Ok(Evaluation {
            values: y,
            underflow,
        });
    }

    let levels = ScaleLevels::new(lim);
    let rz = two_over(zn);
    let mut ck = rz * (fnu + T::one());
    let [mut s1, mut s2] = [k_pair.values[0], k_pair.values[1]];
    let as2 = modulus(s2);
    let mut level = if as2 <= levels.bry[0] {
        0
    } else if as2 >= levels.bry[1] {
        2
    } else {
        1
    };
    let mut bound = levels.bry[level];
    s1 = s1 * levels.css[level];
    s2 = s2 * levels.css[level];
    let mut back = levels.csr[level];

    for slot in y.iter_mut().skip(2) {
        let prev = s2;
        s2 = ck * prev + s1;
        s1 = prev;
        let mut c1 = s2 * back;
        let mut carried = c1;
        let mut c2 = *slot;
        if scaled && rescaled >= 0 {
            let c = combine(zn, c1, c2, lim.ascle, lim.alim, &mut rescaled);
            c1 = c.s1;
            c2 = c.s2;
            underflow += usize::from(c.underflow);
            kept = [kept[1], c1];
            if rescaled == RESTART_AFTER {
                tracing::debug!("continuation: restarting K recurrence from combined values");
                rescaled = -4;
                s1 = kept[0] * levels.css[level];
                s2 = kept[1] * levels.css[level];
                carried = kept[1];
            }
        }
        *slot = cspn * c1 + csgn * c2;
        ck = ck + rz;
        cspn = -cspn;

        if level < 2 && c1.re.abs().max(c1.im.abs()) > bound {
            level += 1;
            bound = levels.bry[level];
            s1 = s1 * back * levels.css[level];
            s2 = carried * levels.css[level];
            back = levels.csr[level];
        }
    }

    Ok(Evaluation {
        values: y,
        underflow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn k_half(z: Complex64) -> Complex64 {
        (Complex64::new(core::f64::consts::PI, 0.0) / (z * 2.0)).sqrt() * (-z).exp()
    }

    #[test]
    fn half_order_matches_closed_form_off_axis() {
        // sqrt(π/2z) e^{-z} is single valued away from the cut
        let lim = Limits::<f64>::machine();
        for z in [Complex64::new(-1.5, 0.8), Complex64::new(-3.0, -2.5)] {
            let ev = continue_k(z, 0.5, Scaling::Unscaled, Rotation::toward(z), 3, &lim).unwrap();
            let k0 = k_half(z);
            let want = [
                k0,
                k0 * (Complex64::new(1.0, 0.0) + 1.0 / z),
                k0 * (Complex64::new(1.0, 0.0) + 3.0 / z + 3.0 / (z * z)),
            ];
            for (got, w) in ev.values.iter().zip(want) {
                assert!((got - w).norm() < 1e-12 * w.norm(), "z = {z}");
            }
        }
    }

    #[test]
    fn scaled_mode_differs_by_exp_z() {
        let lim = Limits::<f64>::machine();
        let z = Complex64::new(-2.0, 1.25);
        let rot = Rotation::toward(z);
        let a = continue_k(z, 1.0 / 3.0, Scaling::Unscaled, rot, 4, &lim).unwrap();
        let b = continue_k(z, 1.0 / 3.0, Scaling::Exponential, rot, 4, &lim).unwrap();
        for (u, s) in a.values.iter().zip(&b.values) {
            assert!((*s * (-z).exp() - u).norm() < 1e-12 * u.norm());
        }
    }

    #[test]
    fn recurrence_carries_through_continuation() {
        let lim = Limits::<f64>::machine();
        let z = Complex64::new(-0.9, -1.7);
        let nu = 2.0 / 3.0;
        let ev = continue_k(z, nu, Scaling::Unscaled, Rotation::toward(z), 5, &lim).unwrap();
        let rz = Complex64::new(2.0, 0.0) / z;
        for k in 1..4 {
            let lhs = ev.values[k + 1];
            let rhs = rz * (nu + k as f64) * ev.values[k] + ev.values[k - 1];
            assert!((lhs - rhs).norm() < 1e-11 * lhs.norm());
        }
    }

    #[test]
    fn rotation_follows_imaginary_part() {
        assert_eq!(Rotation::toward(Complex64::new(-1.0, -0.1)), Rotation::Clockwise);
        assert_eq!(Rotation::toward(Complex64::new(-1.0, 0.0)), Rotation::CounterClockwise);
    }
}
