//! Power series for I on small arguments.
//!
//! `I_ν(z) = (z/2)^ν Σ (z²/4)^k / (k! Γ(ν+k+1))`, summed for the two highest
//! orders and recurred backward for the rest. Trailing orders whose leading
//! coefficient underflows are zeroed; when that happens while `|z²/4|` is
//! larger than the order, the series is the wrong tool for what is left and
//! the dispatcher is told to finish with another method.

use alloc::vec;

use num_complex::Complex;

use crate::algo::gamma::ln_gamma;
use crate::algo::thresholds::ASCLE_FACTOR;
use crate::algo::underflow::is_underflow;
use crate::algo::Evaluation;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Error, Scaling};
use crate::utils::{modulus, mul_add_real, quotient, two_over};

/// Result of a power-series attempt.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SeriesOutcome<T> {
    /// The sequence is complete; trailing underflowed entries are zero.
    Done(Evaluation<T>),
    /// The last `underflow` orders underflowed but the series does not
    /// reach the remaining `n - underflow`; recompute those another way.
    Handoff { underflow: usize },
}

/// Sum the power series for `I_{fnu+k}(z)`, `k = 0..n`.
pub(crate) fn series<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<SeriesOutcome<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let czero = Complex::new(zero, zero);
    let cone = Complex::new(one, zero);
    let tol = lim.tol;

    let mut y = vec![czero; n];
    let mut nz = 0;

    let az = modulus(z);
    let arm = T::from_f64(ASCLE_FACTOR) * T::MACH_TINY;
    if az < arm {
        // only I_0(0) = 1 is nonzero at the origin
        if fnu == zero {
            y[0] = cone;
            nz = n - 1;
        } else {
            nz = n;
        }
        return Ok(SeriesOutcome::Done(Evaluation {
            values: y,
            underflow: nz,
        }));
    }

    let rtr1 = arm.sqrt();
    let hz = z * T::from_f64(0.5);
    let cz = if az > rtr1 { hz * hz } else { czero };
    let acz = modulus(cz);
    let ck = hz.ln();
    let mut nn = n;

    'orders: loop {
        let dfnu = fnu + T::from_f64((nn - 1) as f64);
        let fnup = dfnu + one;

        let mut ak1 = Complex::new(ck.re * dfnu - ln_gamma(fnup)?, ck.im * dfnu);
        if scaling == Scaling::Exponential {
            ak1.re = ak1.re - z.re;
        }

        if ak1.re <= -lim.elim {
            nz += 1;
            y[nn - 1] = czero;
            if acz > dfnu {
                return Ok(SeriesOutcome::Handoff { underflow: nz });
            }
            nn -= 1;
            if nn == 0 {
                break 'orders;
            }
            continue 'orders;
        }

        let mut scaled = false;
        let mut ss = one;
        let mut crscr = one;
        let mut ascle = zero;
        if ak1.re <= -lim.alim {
            tracing::debug!(order = ?dfnu, "series switched to 1/tol scaled arithmetic");
            scaled = true;
            ss = one / tol;
            crscr = tol;
            ascle = arm * ss;
        }

        let mut coef = ak1.exp();
        if scaled {
            coef = coef * ss;
        }
        let atol = tol * acz / fnup;
        let il = nn.min(2);
        let mut top = [czero; 2];

        for (i, slot) in top.iter_mut().enumerate().take(il) {
            let dfnu_i = fnu + T::from_f64((nn - 1 - i) as f64);
            let fnup_i = dfnu_i + one;
            let mut s1 = cone;
            if acz >= tol * fnup_i {
                let mut term = cone;
                let mut ak = fnup_i + two;
                let mut s = fnup_i;
                let mut aa = two;
                loop {
                    let rs = one / s;
                    term = term * cz * rs;
                    s1 = s1 + term;
                    s = s + ak;
                    ak = ak + two;
                    aa = aa * acz * rs;
                    if aa <= atol {
                        break;
                    }
                }
            }

            let s2 = s1 * coef;
            *slot = s2;
            if scaled && is_underflow(s2, ascle, tol) {
                nz += 1;
                y[nn - 1] = czero;
                if acz > dfnu_i {
                    return Ok(SeriesOutcome::Handoff { underflow: nz });
                }
                nn -= 1;
                if nn == 0 {
                    break 'orders;
                }
                continue 'orders;
            }

            y[nn - 1 - i] = s2 * crscr;
            if i + 1 < il {
                coef = quotient(coef, hz) * dfnu_i;
            }
        }

        if nn > 2 {
            recur_down(z, fnu, &mut y[..nn], top, scaled, crscr, ascle);
        }
        break 'orders;
    }

    Ok(SeriesOutcome::Done(Evaluation {
        values: y,
        underflow: nz,
    }))
}

/// Fill `y[..len-2]` from the top two entries with
/// `I_{ν-1} = (2ν/z) I_ν + I_{ν+1}`.
///
/// When the top pair was summed at scale 1/tol, the recurrence keeps running
/// on the scaled pair until a result clears `ascle`, then continues on the
/// unscaled entries already stored.
fn recur_down<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    y: &mut [Complex<T>],
    top: [Complex<T>; 2],
    scaled: bool,
    crscr: T,
    ascle: T,
) {
    let one = T::one();
    let nn = y.len();
    let rz = two_over(z);
    let mut ak = T::from_f64((nn - 2) as f64);
    let mut k = nn - 2;

    if scaled {
        let [mut s1, mut s2] = top;
        while k > 0 {
            k -= 1;
            let prev = s2;
            s2 = mul_add_real(rz * prev, ak + fnu, s1);
            s1 = prev;
            y[k] = s2 * crscr;
            ak = ak - one;
            if modulus(y[k]) > ascle {
                break;
            }
        }
    }
    while k > 0 {
        k -= 1;
        y[k] = mul_add_real(rz * y[k + 1], ak + fnu, y[k + 2]);
        ak = ak - one;
    }
}
