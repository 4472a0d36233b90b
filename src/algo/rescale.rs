//! Underflow manager for exponentially scaled K sequences.
//!
//! The K kernel switches to `exp(z)`-scaled arithmetic when `Re z` is large
//! enough that unscaled values underflow. Bringing such a sequence back to
//! its true scale zeroes the leading members that are too small, and the
//! three-term recurrence has to keep running on the scaled values until two
//! consecutive members are representable again: only then can the rest of
//! the sequence be trusted.

use alloc::vec::Vec;

use num_complex::Complex;

use crate::algo::underflow::is_underflow;
use crate::algo::Evaluation;
use crate::machine::BesselFloat;
use crate::utils::modulus;

/// `exp(ln s - zd) / tol` when that is representable and keeps its phase.
///
/// Also returns `ln |s|`, which callers use to decide when the scaled
/// recurrence itself needs to be pulled down by `exp(-elim)`.
pub(crate) fn unscale<T: BesselFloat>(
    s: Complex<T>,
    zd: Complex<T>,
    tol: T,
    elim: T,
    ascle: T,
) -> (Option<Complex<T>>, T) {
    let alas = modulus(s).ln();
    if -zd.re + alas < -elim {
        return (None, alas);
    }
    let cs = s.ln() - zd;
    let mag = cs.re.exp() / tol;
    let y = Complex::new(mag * cs.im.cos(), mag * cs.im.sin());
    if is_underflow(y, ascle, tol) {
        (None, alas)
    } else {
        (Some(y), alas)
    }
}

/// Unscale `scaled` (values of `exp(zr)·K_{fnu+k}(zr)`, k = 0..n) and zero
/// everything that underflows.
///
/// The leading entries are recomputed from the recurrence
/// `K_{ν+1} = (2ν/z)·K_ν + K_{ν-1}` on the scaled values; once two
/// consecutive entries come back on scale, every earlier entry is zeroed and
/// the returned count equals the number of zeroed leading entries. The
/// survivors stay at scale 1/`tol`; the caller unscales them.
pub(crate) fn rescale_k<T: BesselFloat>(
    zr: Complex<T>,
    fnu: T,
    scaled: Vec<Complex<T>>,
    rz: Complex<T>,
    ascle: T,
    tol: T,
    elim: T,
) -> Evaluation<T> {
    let czero = Complex::new(T::zero(), T::zero());
    let n = scaled.len();
    if n == 0 {
        return Evaluation::complete(scaled);
    }

    let mut y = scaled;
    let mut seed = [czero; 2];
    let mut nz = 0;
    // 1-based index of the latest entry that came back on scale
    let mut last_on_scale = 0;

    for (i, slot) in y.iter_mut().take(2).enumerate() {
        seed[i] = *slot;
        *slot = czero;
        nz += 1;
        if let (Some(v), _) = unscale(seed[i], zr, tol, elim, ascle) {
            *slot = v;
            last_on_scale = i + 1;
            nz -= 1;
        }
    }

    if n == 1 {
        return Evaluation {
            values: y,
            underflow: nz,
        };
    }
    if last_on_scale <= 1 {
        y[0] = czero;
        nz = 2;
    }
    if n == 2 || nz == 0 {
        return Evaluation {
            values: y,
            underflow: nz,
        };
    }

    let mut ck = rz * (fnu + T::one());
    let [mut s1, mut s2] = seed;
    let helim = T::from_f64(0.5) * elim;
    let shrink = (-elim).exp();
    let mut zd = zr;
    let mut pair_at = None;

    for i in 2..n {
        let kk = i + 1;
        let prev = s2;
        s2 = ck * prev + s1;
        s1 = prev;
        ck = ck + rz;
        y[i] = czero;

        let (on_scale, alas) = unscale(s2, zd, tol, elim, ascle);
        if let Some(v) = on_scale {
            y[i] = v;
            if last_on_scale == kk - 1 {
                pair_at = Some(kk);
                break;
            }
            last_on_scale = kk;
            continue;
        }
        if alas >= helim {
            zd.re = zd.re - elim;
            s1 = s1 * shrink;
            s2 = s2 * shrink;
        }
    }

    nz = match pair_at {
        Some(kk) => kk - 2,
        None if last_on_scale == n => n - 1,
        None => n,
    };
    for v in y.iter_mut().take(nz) {
        *v = czero;
    }
    tracing::debug!(n, underflow = nz, "rescaled K sequence");

    Evaluation {
        values: y,
        underflow: nz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use num_complex::Complex64;

    const TOL: f64 = 1e-16;
    const ELIM: f64 = 700.0;

    #[test]
    fn large_single_value_survives() {
        let out = rescale_k(
            Complex64::new(1.0, 0.0),
            0.5,
            vec![Complex64::new(1e100, 0.0)],
            Complex64::new(2.0, 0.0),
            1e-300,
            TOL,
            ELIM,
        );
        assert_eq!(out.underflow, 0);
        assert_ne!(out.values[0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn everything_below_floor_vanishes() {
        let zr = Complex64::new(700.0, 0.0);
        let out = rescale_k(
            zr,
            0.5,
            vec![Complex64::new(1e-100, 0.0); 2],
            Complex64::new(2.0 / 700.0, 0.0),
            1e-290,
            TOL,
            ELIM,
        );
        assert_eq!(out.underflow, 2);
        assert!(out.values.iter().all(|v| *v == Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn empty_sequence_is_untouched() {
        let out = rescale_k(
            Complex64::new(1.0, 0.0),
            0.5,
            Vec::new(),
            Complex64::new(2.0, 0.0),
            1e-300,
            TOL,
            ELIM,
        );
        assert_eq!(out.underflow, 0);
        assert!(out.values.is_empty());
    }

    #[test]
    fn underflow_cascades_until_two_members_recover() {
        // Leading members sit below exp(-elim) once unscaled; the recurrence
        // on the scaled values grows until a consecutive pair is on scale.
        let zr = Complex64::new(720.0, 0.0);
        let rz = Complex64::new(2.0 / 720.0, 0.0);
        let scaled = vec![
            Complex64::new(1e-20, 0.0),
            Complex64::new(1e-20, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ];
        let out = rescale_k(zr, 400.0, scaled, rz, 1e-290, TOL, ELIM);
        assert!(out.underflow <= 5);
        assert_eq!(out.values.len(), 5);
        for v in out.values.iter().take(out.underflow) {
            assert_eq!(*v, Complex64::new(0.0, 0.0));
        }
    }
}
