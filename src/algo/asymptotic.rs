//! Large-argument asymptotic expansion for I.
//!
//! For `|z|` large against the order,
//! `I_ν(z) ~ e^z/√(2πz) Σ (-1)^k a_k(ν)/z^k + p1·e^{-z}/√(2πz) Σ a_k(ν)/z^k`
//! with `p1 = e^{±iπ(ν+½)}`. The two highest orders are summed directly and
//! the rest come from the backward recurrence.

use alloc::vec;

use num_complex::Complex;

use crate::algo::thresholds::{ASCLE_FACTOR, INV_TWO_PI, PI};
use crate::algo::Evaluation;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Error, Scaling};
use crate::utils::{modulus, quotient, two_over};

pub(crate) fn asymptotic<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let eight = T::from_f64(8.0);
    let czero = Complex::new(zero, zero);
    let cone = Complex::new(one, zero);

    let az = modulus(z);
    let rtr1 = (T::from_f64(ASCLE_FACTOR) * T::MACH_TINY).sqrt();
    let il = n.min(2);
    let dfnu = fnu + T::from_f64((n - il) as f64);

    let raz = one / az;
    let rtpi = T::from_f64(INV_TWO_PI);
    let mut ak1 = (z.conj() * (rtpi * raz * raz)).sqrt();

    let cz = match scaling {
        Scaling::Unscaled => z,
        Scaling::Exponential => Complex::new(zero, z.im),
    };
    if cz.re.abs() > lim.elim {
        return Err(Error::Overflow);
    }
    let dnu2 = dfnu + dfnu;
    let deferred = cz.re.abs() > lim.alim && n > 2;
    if deferred {
        tracing::debug!(n, "asymptotic expansion defers exp(z) until after recurrence");
    } else {
        ak1 = ak1 * cz.exp();
    }

    let mut fdn = if dnu2 > rtr1 { dnu2 * dnu2 } else { zero };
    let ez = z * eight;
    let aez = eight * az;
    let s = lim.tol / aez;
    let jl = (lim.rl + lim.rl).trunc_i32() + 2;

    let mut p1 = czero;
    if z.im != zero {
        // e^{iπ(ν+½)} with the integer part folded into a sign
        let inu = fnu.trunc_i32();
        let arg = (fnu - T::from_f64(f64::from(inu))) * T::from_f64(PI);
        let turns = inu + (n - il) as i32;
        let mut bk = arg.cos();
        if z.im < zero {
            bk = -bk;
        }
        p1 = Complex::new(-arg.sin(), bk);
        if turns % 2 != 0 {
            p1 = -p1;
        }
    }

    let mut y = vec![czero; n];
    for k in 0..il {
        let sqk0 = fdn - one;
        let atol = s * sqk0.abs();
        let mut sgn = one;
        let mut cs1 = cone;
        let mut cs2 = cone;
        let mut ck = cone;
        let mut ak = zero;
        let mut aa = one;
        let mut bb = aez;
        let mut dk = ez;
        let mut sqk = sqk0;

        let mut converged = false;
        for _ in 0..jl {
            ck = quotient(ck, dk) * sqk;
            cs2 = cs2 + ck;
            sgn = -sgn;
            cs1 = cs1 + ck * sgn;
            dk = dk + ez;
            aa = aa * sqk.abs() / bb;
            bb = bb + aez;
            ak = ak + eight;
            sqk = sqk - ak;
            if aa <= atol {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(Error::ConvergenceFailure);
        }

        let mut s2 = cs1;
        if z.re + z.re < lim.elim {
            s2 = s2 + (-(z + z)).exp() * p1 * cs2;
        }
        fdn = fdn + eight * dfnu + T::from_f64(4.0);
        p1 = -p1;
        y[n - il + k] = s2 * ak1;
    }

    if n > 2 {
        let rz = two_over(z);
        let mut ak = T::from_f64((n - 2) as f64);
        for k in (0..n - 2).rev() {
            y[k] = rz * y[k + 1] * (ak + fnu) + y[k + 2];
            ak = ak - one;
        }
        if deferred {
            let ck = cz.exp();
            for v in y.iter_mut() {
                *v = *v * ck;
            }
        }
    }

    Ok(Evaluation::complete(y))
}
