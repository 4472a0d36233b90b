//! Method selection for I.
//!
//! In the right half plane the power series is tried first; what it cannot
//! finish goes to the asymptotic expansion when `|z|` is large against the
//! order, otherwise to Miller's algorithm. A Miller run that fails to
//! converge gets one more attempt with the asymptotic expansion before the
//! failure is reported.

use num_complex::Complex;

use crate::algo::asymptotic::asymptotic;
use crate::algo::miller::{neumann, wronskian};
use crate::algo::series::{series, SeriesOutcome};
use crate::algo::thresholds::I_SERIES_RADIUS;
use crate::algo::Evaluation;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Error, Scaling};
use crate::utils::{half_turns, modulus};

/// `I_{fnu+k}(z)`, `k = 0..n`, for `Re z ≥ 0`.
///
/// Underflowed entries are the trailing ones; their count is returned with
/// the values.
pub(crate) fn bessel_i<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let one = T::one();
    let az = modulus(z);
    let mut nn = n;
    let mut dfnu = fnu + T::from_f64((n - 1) as f64);

    let mut trailing = 0;
    if az <= T::from_f64(I_SERIES_RADIUS) || az * az * T::from_f64(0.25) <= dfnu + one {
        tracing::trace!(n, "I: power series");
        match series(z, fnu, scaling, n, lim)? {
            SeriesOutcome::Done(ev) => return Ok(ev),
            SeriesOutcome::Handoff { underflow } => {
                tracing::debug!(underflow, "I: series handed off the lower orders");
                trailing = underflow;
                nn = n - underflow;
                if nn == 0 {
                    return Ok(Evaluation::vanished(n));
                }
                dfnu = fnu + T::from_f64((nn - 1) as f64);
            }
        }
    }

    let head = beyond_series(z, fnu, scaling, nn, az, dfnu, lim)?;
    let mut values = head.values;
    values.resize(n, Complex::new(T::zero(), T::zero()));
    Ok(Evaluation {
        values,
        underflow: head.underflow + trailing,
    })
}

fn beyond_series<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    az: T,
    dfnu: T,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    if az >= lim.rl && (dfnu <= T::one() || az + az >= dfnu * dfnu) {
        tracing::trace!(n, "I: asymptotic expansion");
        return asymptotic(z, fnu, scaling, n, lim);
    }
    if az > lim.rl {
        tracing::trace!(n, "I: Miller recurrence, Wronskian normalization");
        return wronskian(z, fnu, scaling, n, lim);
    }
    tracing::trace!(n, "I: Miller recurrence, Neumann normalization");
    match neumann(z, fnu, scaling, n, lim) {
        Err(Error::ConvergenceFailure) => {
            tracing::debug!("I: Miller recurrence did not converge, trying asymptotic expansion");
            asymptotic(z, fnu, scaling, n, lim)
        }
        other => other,
    }
}

/// `I_{fnu+k}(z)` anywhere in the plane.
///
/// The left half plane uses `I_ν(z) = e^{±iπν} I_ν(-z)`, with the sign of
/// `Im z`. Values that sit near the underflow floor are lifted by 1/tol
/// before the phase factor is applied.
pub(crate) fn i_sequence<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let zero = T::zero();
    if z.re >= zero {
        return bessel_i(z, fnu, scaling, n, lim);
    }

    let sign = if z.im < zero { -T::one() } else { T::one() };
    let mut csgn = half_turns(fnu, sign);
    let mut ev = bessel_i(-z, fnu, scaling, n, lim)?;

    let rtol = T::one() / lim.tol;
    let live = n - ev.underflow;
    for v in ev.values.iter_mut().take(live) {
        let (mut w, mut atol) = (*v, T::one());
        if w.re.abs().max(w.im.abs()) <= lim.ascle {
            w = w * rtol;
            atol = lim.tol;
        }
        *v = (w * csgn) * atol;
        csgn = -csgn;
    }
    Ok(ev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn each_regime_gives_known_values() {
        let lim = Limits::<f64>::machine();
        // series
        let ev = bessel_i(Complex64::new(1.0, 0.0), 0.0, Scaling::Unscaled, 1, &lim).unwrap();
        assert!((ev.values[0].re - 1.2660658777520084).abs() < 1e-14);
        // Miller, Neumann normalization
        let ev = bessel_i(Complex64::new(10.0, 0.0), 0.0, Scaling::Exponential, 1, &lim).unwrap();
        assert!((ev.values[0].re - 0.1278333371634286).abs() < 1e-13);
    }

    #[test]
    fn asymptotic_regime_agrees_with_direct_series() {
        let lim = Limits::<f64>::machine();
        let z = Complex64::new(30.0, 0.0);
        let ev = bessel_i(z, 0.0, Scaling::Exponential, 1, &lim).unwrap();
        let SeriesOutcome::Done(reference) = series(z, 0.0, Scaling::Exponential, 1, &lim).unwrap()
        else {
            panic!("series handed off on the real axis");
        };
        let rel = (ev.values[0] - reference.values[0]).norm() / reference.values[0].norm();
        assert!(rel < 1e-12, "relative difference {rel:e}");
    }

    #[test]
    fn wronskian_branch_is_consistent() {
        let lim = Limits::<f64>::machine();
        // |z| > rl with an order too large for the asymptotic expansion
        let z = Complex64::new(20.0, 12.0);
        let ev = bessel_i(z, 20.0, Scaling::Exponential, 3, &lim).unwrap();
        let rz = Complex64::new(2.0, 0.0) / z;
        let lhs = ev.values[0];
        let rhs = rz * 21.0 * ev.values[1] + ev.values[2];
        assert!((lhs - rhs).norm() < 1e-12 * lhs.norm());
    }

    #[test]
    fn reflection_matches_integer_order_parity() {
        // I_n(-z) = (-1)^n I_n(z)
        let lim = Limits::<f64>::machine();
        let z = Complex64::new(1.5, 0.75);
        let right = i_sequence(z, 0.0, Scaling::Unscaled, 3, &lim).unwrap();
        let left = i_sequence(-z, 0.0, Scaling::Unscaled, 3, &lim).unwrap();
        for (k, (r, l)) in right.values.iter().zip(&left.values).enumerate() {
            let expected = if k % 2 == 0 { *r } else { -*r };
            assert!((l - expected).norm() < 1e-14 * r.norm());
        }
    }
}
