//! The Airy function Ai(z) and its derivative.
//!
//! Near the origin both come from the Maclaurin series
//!
//! ```text
//! Ai(z)  = Ai(0)·f(z) + Ai'(0)·z·g(z)
//! Ai'(z) = Ai'(0)·g'(z) + Ai(0)·z²/2·f'(z)
//! ```
//!
//! with `f`, `g` power series in `z³`. Everywhere else they are reduced to
//! the modified Bessel function of order 1/3 or 2/3 at `ζ = (2/3) z^{3/2}`:
//!
//! ```text
//! Ai(z)  =  (1/π) √(z/3) K_{1/3}(ζ)
//! Ai'(z) = -(1/π) (z/√3) K_{2/3}(ζ)
//! ```
//!
//! evaluated directly when `ζ` is in the right half plane and through the
//! analytic continuation otherwise.

#![allow(clippy::excessive_precision)]

use num_complex::Complex;

use crate::algo::bessel_k::bessel_k;
use crate::algo::continuation::{continue_k, Rotation};
use crate::algo::thresholds::{
    AIRY_K_COEF, AIRY_SERIES_RADIUS, AIRY_SERIES_TERMS, AI_PRIME_ZERO, AI_ZERO, ASCLE_FACTOR,
    INT_RANGE_CAP, TWO_THIRDS,
};
use crate::machine::{BesselFloat, Limits};
use crate::types::{Accuracy, AiryDerivative, AiryResult, Error, Scaling};
use crate::utils::modulus;

/// Evaluate Ai(z) or Ai'(z).
pub(crate) fn airy<T: BesselFloat>(
    z: Complex<T>,
    deriv: AiryDerivative,
    scaling: Scaling,
    lim: &Limits<T>,
) -> Result<AiryResult<T>, Error> {
    let az = modulus(z);
    if az > T::from_f64(AIRY_SERIES_RADIUS) {
        return via_bessel_k(z, az, deriv, scaling, lim);
    }

    tracing::trace!("Ai: power series");
    let value = power_series(z, az, deriv, scaling, lim.tol);
    Ok(AiryResult {
        value,
        underflow_count: 0,
        status: Accuracy::Normal,
    })
}

/// Sums of `f` and `g` (or their derivatives) for `|z| ≤ 1`.
fn power_series<T: BesselFloat>(
    z: Complex<T>,
    az: T,
    deriv: AiryDerivative,
    scaling: Scaling,
    tol: T,
) -> Complex<T> {
    let zero = T::zero();
    let one = T::one();
    let c1 = T::from_f64(AI_ZERO);
    let c2 = T::from_f64(AI_PRIME_ZERO);

    if az < tol {
        return taylor_at_origin(z, az, deriv);
    }

    let fid: T = deriv.order();
    let mut s1 = Complex::new(one, zero);
    let mut s2 = Complex::new(one, zero);
    let aa = az * az;
    if aa >= tol / az {
        let mut trm1 = s1;
        let mut trm2 = s2;
        let mut atrm = one;
        let z3 = z * z * z;
        let az3 = az * aa;
        let mut d1 = (T::from_f64(2.0) + fid) * (T::from_f64(3.0) + fid + fid);
        let mut d2 = (T::from_f64(3.0) - fid - fid) * (T::from_f64(4.0) - fid);
        let mut ad = d1.min(d2);
        let mut ak = T::from_f64(24.0) + T::from_f64(9.0) * fid;
        let mut bk = T::from_f64(30.0) - T::from_f64(9.0) * fid;
        for _ in 0..AIRY_SERIES_TERMS {
            trm1 = trm1 * z3 / d1;
            s1 = s1 + trm1;
            trm2 = trm2 * z3 / d2;
            s2 = s2 + trm2;
            atrm = atrm * az3 / ad;
            d1 = d1 + ak;
            d2 = d2 + bk;
            ad = d1.min(d2);
            if atrm < tol * ad {
                break;
            }
            ak = ak + T::from_f64(18.0);
            bk = bk + T::from_f64(18.0);
        }
    }

    let value = match deriv {
        AiryDerivative::Value => s1 * c1 - z * s2 * c2,
        AiryDerivative::Derivative => {
            let mut v = -(s2 * c2);
            if az > tol {
                let cc = c1 / (one + fid);
                v = v + z * s1 * z * cc;
            }
            v
        }
    };
    match scaling {
        Scaling::Unscaled => value,
        Scaling::Exponential => value * (z * z.sqrt() * T::from_f64(TWO_THIRDS)).exp(),
    }
}

/// One- or two-term Taylor polynomial for `|z| < tol`.
fn taylor_at_origin<T: BesselFloat>(z: Complex<T>, az: T, deriv: AiryDerivative) -> Complex<T> {
    let zero = T::zero();
    let c1 = T::from_f64(AI_ZERO);
    let c2 = T::from_f64(AI_PRIME_ZERO);
    let floor = T::from_f64(ASCLE_FACTOR) * T::MACH_TINY;
    match deriv {
        AiryDerivative::Value => {
            let s1 = if az > floor { z * c2 } else { Complex::new(zero, zero) };
            Complex::new(c1 - s1.re, -s1.im)
        }
        AiryDerivative::Derivative => {
            let mut v = Complex::new(-c2, zero);
            if az > floor.sqrt() {
                let half_z2 = Complex::new(
                    T::from_f64(0.5) * (z.re * z.re - z.im * z.im),
                    z.re * z.im,
                );
                v = v + half_z2 * c1;
            }
            v
        }
    }
}

/// `|z| > 1`: reduce to `K_{1/3}` or `K_{2/3}` at `ζ`.
fn via_bessel_k<T: BesselFloat>(
    z: Complex<T>,
    az: T,
    deriv: AiryDerivative,
    scaling: Scaling,
    lim: &Limits<T>,
) -> Result<AiryResult<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let fnu = (one + deriv.order::<T>()) / T::from_f64(3.0);
    let alaz = az.ln();
    let quarter = T::from_f64(0.25);

    let mut aa = (T::from_f64(0.5) / lim.tol).min(T::from_f64(INT_RANGE_CAP));
    aa = aa.powf(T::from_f64(TWO_THIRDS));
    if az > aa {
        return Err(Error::TotalPrecisionLoss);
    }
    let status = if az > aa.sqrt() {
        Accuracy::Reduced
    } else {
        Accuracy::Normal
    };

    let csq = z.sqrt();
    let mut zta = z * csq * T::from_f64(TWO_THIRDS);
    // Re ζ ≤ 0 in the left half plane; ζ purely imaginary on the negative axis
    let ak = zta.im;
    if z.re < zero {
        zta = Complex::new(-zta.re.abs(), ak);
    }
    if z.im == zero && z.re <= zero {
        zta = Complex::new(zero, ak);
    }

    // sfac keeps the product with √z or z in range when K sits near an end
    let mut sfac = None;
    let mut underflow = 0;
    let k = if zta.re >= zero && z.re > zero {
        if scaling == Scaling::Unscaled && zta.re >= lim.alim {
            sfac = Some(one / lim.tol);
            if -zta.re - quarter * alaz < -lim.elim {
                tracing::debug!("Ai: underflow in the right half plane");
                return Ok(AiryResult {
                    value: Complex::new(zero, zero),
                    underflow_count: 1,
                    status,
                });
            }
        }
        tracing::trace!("Ai: K kernel at zeta");
        let ev = bessel_k(zta, fnu, scaling, 1, lim)?;
        underflow += ev.underflow;
        ev.values[0]
    } else {
        if scaling == Scaling::Unscaled && zta.re <= -lim.alim {
            sfac = Some(lim.tol);
            if -zta.re + quarter * alaz > lim.elim {
                return Err(Error::Overflow);
            }
        }
        tracing::trace!("Ai: analytic continuation at zeta");
        let ev = continue_k(zta, fnu, scaling, Rotation::toward(z), 1, lim)?;
        underflow += ev.underflow;
        ev.values[0]
    };

    let s1 = k * T::from_f64(AIRY_K_COEF);
    let factor = match deriv {
        AiryDerivative::Value => csq,
        AiryDerivative::Derivative => -z,
    };
    let value = match sfac {
        None => factor * s1,
        Some(sfac) => (s1 * sfac) * factor / sfac,
    };
    Ok(AiryResult {
        value,
        underflow_count: underflow,
        status,
    })
}
