//! Miller backward recurrence for I in the intermediate regime.
//!
//! The recurrence `I_{ν-1} = (2ν/z) I_ν + I_{ν+1}` is stable downward, so a
//! trial sequence started far above the wanted orders converges to the I
//! sequence up to one unknown factor. Two ways of fixing that factor are
//! provided:
//!
//! - [`neumann`] accumulates the Neumann series
//!   `Σ (ν+k) Γ(2ν+k)/k! · I_{ν+k}(z) = (z/2)^ν e^z / Γ(1+ν)` alongside the
//!   recurrence;
//! - [`wronskian`] builds the sequence from ratios and normalizes the
//!   lowest pair through `I_ν K_{ν+1} + I_{ν+1} K_ν = 1/z`.

use alloc::vec;

use num_complex::Complex;

use crate::algo::bessel_k::bessel_k;
use crate::algo::gamma::ln_gamma;
use crate::algo::ratios::i_ratios;
use crate::algo::thresholds::MILLER_MAX_ITER;
use crate::algo::Evaluation;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Error, Scaling};
use crate::utils::{cis, modulus, mul_add, mul_add_real, quotient, two_over};

/// I sequence normalized by the Neumann series.
pub(crate) fn neumann<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let czero = Complex::new(zero, zero);
    let cone = Complex::new(one, zero);
    let tol = lim.tol;

    let scle = T::MACH_TINY / tol;
    let az = modulus(z);
    let iaz = az.trunc_i32();
    let ifnu = fnu.trunc_i32();
    let inu = ifnu + n as i32 - 1;
    let at = T::from_f64(f64::from(iaz) + 1.0);
    let raz = one / az;
    let rz = two_over(z);

    // first sweep: truncation index of the Neumann series
    let mut ck = z.conj() * (at * raz * raz);
    let mut p1 = czero;
    let mut p2 = cone;
    let ack = (at + one) * raz;
    let rho = ack + (ack * ack - one).sqrt();
    let rho2 = rho * rho;
    let tst = (rho2 + rho2) / ((rho2 - one) * (rho - one)) / tol;
    let mut ak = at;
    let mut series_index = None;
    for i in 1..=MILLER_MAX_ITER {
        let pt = p2;
        p2 = mul_add(-ck, pt, p1);
        p1 = pt;
        ck = ck + rz;
        if modulus(p2) > tst * ak * ak {
            series_index = Some(i + 1);
            break;
        }
        ak = ak + one;
    }
    let Some(series_index) = series_index else {
        return Err(Error::ConvergenceFailure);
    };

    // second sweep: truncation index for the ratios of the wanted orders
    let mut k = 0;
    if inu >= iaz {
        let at = T::from_f64(f64::from(inu) + 1.0);
        let mut ck = z.conj() * (at * raz * raz);
        let mut p1 = czero;
        let mut p2 = cone;
        let mut tst = (at * raz / tol).sqrt();
        let mut tightened = false;
        let mut found = None;
        for kk in 1..=MILLER_MAX_ITER {
            let pt = p2;
            p2 = mul_add(-ck, pt, p1);
            p1 = pt;
            ck = ck + rz;
            let ap = modulus(p2);
            if ap < tst {
                continue;
            }
            if tightened {
                found = Some(kk);
                break;
            }
            let ack = modulus(ck);
            let flam = ack + (ack * ack - one).sqrt();
            let rho = flam.min(ap / modulus(p1));
            tst = tst * (rho / (rho * rho - one)).sqrt();
            tightened = true;
        }
        match found {
            Some(kk) => k = kk,
            None => return Err(Error::ConvergenceFailure),
        }
    }

    // backward recurrence from the larger of the two start indices
    k += 1;
    let start = (series_index + iaz).max(k + inu);
    let mut fkk = T::from_f64(f64::from(start));
    let fnf = fnu - T::from_f64(f64::from(ifnu));
    let tfnf = fnf + fnf;
    let mut bk =
        (ln_gamma(fkk + tfnf + one)? - ln_gamma(fkk + one)? - ln_gamma(tfnf + one)?).exp();
    let mut p1 = czero;
    let mut p2 = Complex::new(scle, zero);
    let mut sum = czero;

    let mut step = |p1: &mut Complex<T>, p2: &mut Complex<T>, sum: &mut Complex<T>| {
        let pt = *p2;
        *p2 = mul_add_real(rz * pt, fkk + fnf, *p1);
        *p1 = pt;
        let ack = bk * (one - tfnf / (fkk + tfnf));
        *sum = mul_add_real(*p1, ack + bk, *sum);
        bk = ack;
        fkk = fkk - one;
    };

    for _ in 0..start - inu {
        step(&mut p1, &mut p2, &mut sum);
    }
    let mut y = vec![czero; n];
    y[n - 1] = p2;
    for m in (0..n - 1).rev() {
        step(&mut p1, &mut p2, &mut sum);
        y[m] = p2;
    }
    for _ in 0..ifnu {
        step(&mut p1, &mut p2, &mut sum);
    }

    // exp(z) (z/2)^fnf / Γ(1+fnf), divided by the accumulated sum
    let pt = match scaling {
        Scaling::Unscaled => z,
        Scaling::Exponential => Complex::new(zero, z.im),
    };
    let mut lnorm = pt - rz.ln() * fnf;
    lnorm.re = lnorm.re - ln_gamma(one + fnf)?;
    let total = p2 + sum;
    let inv = one / modulus(total);
    let cnorm = (lnorm.exp() * inv) * (total.conj() * inv);

    for v in y.iter_mut() {
        *v = *v * cnorm;
    }
    Ok(Evaluation::complete(y))
}

/// I sequence from ratios normalized by the Wronskian with a K pair.
///
/// Used for `|z| > rl` when the order is too large for the asymptotic
/// expansion. Any underflow in the K pair makes the normalization useless
/// and is reported as `Overflow`.
pub(crate) fn wronskian<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let one = T::one();
    let tol = lim.tol;

    let kpair = bessel_k(z, fnu, scaling, 2, lim)?;
    if kpair.underflow != 0 {
        return Err(Error::Overflow);
    }
    let mut y = i_ratios(z, fnu, n, tol);

    let mut cinu = match scaling {
        Scaling::Unscaled => Complex::new(one, T::zero()),
        Scaling::Exponential => cis(z.im),
    };

    // keep K·z away from the ends of the exponent range
    let acw = modulus(kpair.values[1]);
    let csclr = if acw <= lim.ascle {
        one / tol
    } else if acw >= one / lim.ascle {
        tol
    } else {
        one
    };
    let c1 = kpair.values[0] * csclr;
    let c2 = kpair.values[1] * csclr;

    let mut ratio = y[0];
    let ct = z * (ratio * c1 + c2);
    cinu = quotient(cinu, ct);
    y[0] = cinu * csclr;
    for v in y.iter_mut().skip(1) {
        cinu = ratio * cinu;
        ratio = *v;
        *v = cinu * csclr;
    }
    Ok(Evaluation::complete(y))
}
