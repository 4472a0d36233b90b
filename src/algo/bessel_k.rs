//! K in the right half plane.
//!
//! The order is split as `ν = inu + dnu` with `|dnu| ≤ ½`. `K_dnu` and
//! `K_{dnu+1}` come from Temme's series when `|z| ≤ 2` and from a Miller-type
//! backward recurrence (Temme's normalization, Campbell's start index)
//! otherwise; forward recurrence then climbs to the wanted orders.
//!
//! The recurrence runs on one of three scale levels (values multiplied by
//! 1/tol, 1 or tol) and steps to the next level whenever the unscaled
//! magnitude crosses the level's bound. In unscaled mode with `Re z > alim`
//! the whole computation is carried at `exp(z)` scale and handed to
//! [`rescale_k`] so that underflowed leading orders become exact zeros.

#![allow(clippy::too_many_arguments)]

use alloc::vec;
use alloc::vec::Vec;

use num_complex::Complex;

use crate::algo::gamma::ln_gamma;
use crate::algo::rescale::{rescale_k, unscale};
use crate::algo::thresholds::{
    HALF_PI, K_BITS_PER_DECADE, K_DIGIT_CLAMP, K_FPI, K_INDEX_FIT, K_SERIES_RADIUS,
    K_SMALL_DNU, K_SPI, K_START_INDEX_MAX_ITER, LOG10_2, PI, SQRT_HALF_PI, TEMME_G1,
    TWO_THIRDS,
};
use crate::algo::Evaluation;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Error, Scaling};
use crate::utils::{modulus, quotient, two_over};

/// Scale factors, their inverses, and the bound at which each level is left.
pub(crate) struct ScaleLevels<T> {
    pub css: [T; 3],
    pub csr: [T; 3],
    pub bry: [T; 3],
}

impl<T: BesselFloat> ScaleLevels<T> {
    pub(crate) fn new(lim: &Limits<T>) -> Self {
        let one = T::one();
        ScaleLevels {
            css: [one / lim.tol, one, lim.tol],
            csr: [lim.tol, one, one / lim.tol],
            bry: [lim.ascle, one / lim.ascle, T::MACH_HUGE],
        }
    }
}

/// Forward recurrence state on a scale level.
struct Climb<T> {
    s1: Complex<T>,
    s2: Complex<T>,
    ck: Complex<T>,
    level: usize,
}

impl<T: BesselFloat> Climb<T> {
    /// One step of `K_{ν+1} = (2ν/z) K_ν + K_{ν-1}`; returns the new value
    /// unscaled from the level it was computed on.
    fn step(&mut self, rz: Complex<T>, levels: &ScaleLevels<T>) -> Complex<T> {
        let prev = self.s2;
        self.s2 = self.ck * prev + self.s1;
        self.s1 = prev;
        self.ck = self.ck + rz;
        let p1r = levels.csr[self.level];
        let p2 = self.s2 * p1r;
        if self.level < 2 && p2.re.abs().max(p2.im.abs()) > levels.bry[self.level] {
            self.level += 1;
            let s = levels.css[self.level];
            self.s1 = self.s1 * p1r * s;
            self.s2 = p2 * s;
        }
        p2
    }

    /// Store the pair and continue the recurrence to fill `n` values.
    fn emit(mut self, n: usize, rz: Complex<T>, levels: &ScaleLevels<T>) -> Vec<Complex<T>> {
        let back = levels.csr[self.level];
        let mut y = vec![self.s1 * back];
        if n == 1 {
            return y;
        }
        y.push(self.s2 * back);
        for _ in 2..n {
            y.push(self.step(rz, levels));
        }
        y
    }
}

/// The two starting values, or the finished single value.
enum Seed<T> {
    Pair { s1: Complex<T>, s2: Complex<T>, level: usize },
    Done(Complex<T>),
}

/// `K_{fnu+k}(z)` for `k = 0..n`, `Re z ≥ 0`, `z ≠ 0`.
///
/// The underflow count is the number of leading entries set to zero; it is
/// only ever nonzero in unscaled mode with `Re z > alim`.
pub(crate) fn bessel_k<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    n: usize,
    lim: &Limits<T>,
) -> Result<Evaluation<T>, Error> {
    let half = T::from_f64(0.5);
    let levels = ScaleLevels::new(lim);
    let caz = modulus(z);
    let rz = two_over(z);

    let inu = (fnu + half).trunc_i32();
    let dnu = fnu - T::from_f64(f64::from(inu));
    let dnu2 = if dnu.abs() > lim.tol { dnu * dnu } else { T::zero() };
    let single = inu == 0 && n == 1;

    if dnu.abs() != half && caz <= T::from_f64(K_SERIES_RADIUS) {
        tracing::trace!("K: Temme series");
        let seed = temme_series(z, fnu, dnu, dnu2, caz, rz, scaling, single, lim, &levels)?;
        return match seed {
            Seed::Done(v) => Ok(Evaluation::complete(vec![v])),
            Seed::Pair { s1, s2, level } => {
                Ok(climb(z, fnu, dnu, inu, n, s1, s2, level, false, rz, lim, &levels))
            }
        };
    }

    tracing::trace!("K: Miller ratio for |z| > 2");
    let mut coef = quotient(Complex::new(T::from_f64(SQRT_HALF_PI), T::zero()), z.sqrt());
    let mut underflow_guard = false;
    if scaling == Scaling::Unscaled {
        if z.re > lim.alim {
            tracing::debug!("K: Re z above alim, computing at exp(z) scale");
            underflow_guard = true;
        } else {
            let e = (-z.re).exp() * levels.css[1];
            coef = coef * Complex::new(e * z.im.cos(), -e * z.im.sin());
        }
    }

    let ak = (T::from_f64(PI) * dnu).cos().abs();
    let fhs = (T::from_f64(0.25) - dnu2).abs();
    if dnu.abs() == half || ak == T::zero() || fhs == T::zero() {
        // half-odd order: K_{±1/2} = sqrt(π/2z) e^{-z}
        return Ok(climb(z, fnu, dnu, inu, n, coef, coef, 1, underflow_guard, rz, lim, &levels));
    }

    let (p1, p2, cs) = miller_ratio(z, caz, ak, fhs, dnu2, lim.tol)?;
    let tm = modulus(cs);
    let ptr = T::one() / tm;
    let s1 = coef * (p2 * ptr) * (cs.conj() * ptr);

    if single {
        if underflow_guard {
            return Ok(finish_rescaled(z, fnu, n, s1, s1, rz, lim, &levels));
        }
        return Ok(Evaluation::complete(vec![s1 * levels.csr[1]]));
    }

    // K_{dnu+1} = K_dnu · ((dnu + ½ - p1/p2)/z + 1)
    let tm = modulus(p2);
    let ptr = T::one() / tm;
    let pt = (p1 * ptr) * (p2.conj() * ptr);
    let ratio = quotient(Complex::new(dnu + half - pt.re, -pt.im), z) + T::one();
    let s2 = ratio * s1;
    Ok(climb(z, fnu, dnu, inu, n, s1, s2, 1, underflow_guard, rz, lim, &levels))
}

/// Temme's series for `K_dnu` and, when more than one order is needed,
/// `K_{dnu+1}`.
fn temme_series<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    dnu: T,
    dnu2: T,
    caz: T,
    rz: Complex<T>,
    scaling: Scaling,
    single: bool,
    lim: &Limits<T>,
    levels: &ScaleLevels<T>,
) -> Result<Seed<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let half = T::from_f64(0.5);
    let quarter = T::from_f64(0.25);
    let tol = lim.tol;

    let mut smu = rz.ln();
    let fmu = smu * dnu;
    let (sh, ch) = (fmu.re.sinh(), fmu.re.cosh());
    let (sn, cn) = (fmu.im.sin(), fmu.im.cos());
    let csh = Complex::new(sh * cn, ch * sn);
    let cch = Complex::new(ch * cn, sh * sn);

    let mut fc = one;
    if dnu != zero {
        fc = dnu * T::from_f64(PI);
        fc = fc / fc.sin();
        smu = csh / dnu;
    }

    // t1 = 1/Γ(1-dnu), t2 = 1/Γ(1+dnu)
    let t2 = (-ln_gamma(one + dnu)?).exp();
    let t1 = one / (t2 * fc);
    let g1 = if dnu.abs() > T::from_f64(K_SMALL_DNU) {
        (t1 - t2) / (dnu + dnu)
    } else {
        let mut ak = one;
        let mut s = T::from_f64(TEMME_G1[0]);
        for &c in &TEMME_G1[1..] {
            ak = ak * dnu2;
            let tm = T::from_f64(c) * ak;
            s = s + tm;
            if tm.abs() < tol {
                break;
            }
        }
        -s
    };
    let g2 = (t1 + t2) * half;

    let mut f = (cch * g1 + smu * g2) * fc;
    let efmu = fmu.exp();
    let mut p = efmu * half / t2;
    let mut q = quotient(Complex::new(half, zero), efmu) / t1;
    let mut s1 = f;
    let mut s2 = p;
    let mut ak = one;
    let mut a1 = one;
    let mut ck = Complex::new(one, zero);
    let mut bk = one - dnu2;

    if caz >= tol {
        let cz = z * z * quarter;
        let t1 = quarter * caz * caz;
        loop {
            f = (f * ak + p + q) / bk;
            p = p * (one / (ak - dnu));
            q = q * (one / (ak + dnu));
            let rak = one / ak;
            ck = ck * cz * rak;
            s1 = ck * f + s1;
            if !single {
                s2 = ck * (p - f * ak) + s2;
            }
            a1 = a1 * t1 * rak;
            bk = bk + ak + ak + one;
            ak = ak + one;
            if a1 <= tol {
                break;
            }
        }
    }

    if single {
        if scaling == Scaling::Exponential {
            s1 = s1 * z.exp();
        }
        return Ok(Seed::Done(s1));
    }

    let level = if (fnu + one) * smu.re.abs() > lim.alim { 2 } else { 1 };
    let scale = levels.css[level];
    s2 = (s2 * scale) * rz;
    s1 = s1 * scale;
    if scaling == Scaling::Exponential {
        let ez = z.exp();
        s1 = s1 * ez;
        s2 = s2 * ez;
    }
    Ok(Seed::Pair { s1, s2, level })
}

/// Backward recurrence for the `K_{dnu+1}/K_dnu` ratio.
///
/// Returns the last two recurrence values and their running sum.
fn miller_ratio<T: BesselFloat>(
    z: Complex<T>,
    caz: T,
    ak: T,
    fhs: T,
    dnu2: T,
    tol: T,
) -> Result<(Complex<T>, Complex<T>, Complex<T>), Error> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);

    // crossover between the recurrence-based and fitted start index
    let (lo, hi) = K_DIGIT_CLAMP;
    let bits = T::from_f64(
        (f64::from(T::MACH_DIGITS - 1) * LOG10_2 * K_BITS_PER_DECADE).clamp(lo, hi),
    );
    let t2 = T::from_f64(TWO_THIRDS) * bits - T::from_f64(6.0);
    let angle = if z.re != zero {
        (z.im / z.re).atan().abs()
    } else {
        T::from_f64(HALF_PI)
    };

    let mut fhs = fhs;
    let fk = if t2 <= caz {
        let etest = ak / (T::from_f64(PI) * caz * tol);
        let mut fk = one;
        if etest >= one {
            let mut fks = two;
            let mut ckr = caz + caz + two;
            let mut p1r = zero;
            let mut p2r = one;
            let mut converged = false;
            for _ in 0..K_START_INDEX_MAX_ITER {
                let a = fhs / fks;
                let cbr = ckr / (fk + one);
                let ptr = p2r;
                p2r = cbr * p2r - p1r * a;
                p1r = ptr;
                ckr = ckr + two;
                fks = fks + fk + fk + two;
                fhs = fhs + fk + fk;
                fk = fk + one;
                if etest < p2r.abs() * fk {
                    converged = true;
                    break;
                }
            }
            if !converged {
                tracing::debug!(?caz, "K: start-index recurrence did not converge");
                return Err(Error::ConvergenceFailure);
            }
            fk = fk + T::from_f64(K_SPI) * angle * (t2 / caz).sqrt();
            fhs = (T::from_f64(0.25) - dnu2).abs();
        }
        fk
    } else {
        let fit = K_INDEX_FIT;
        let a2 = caz.sqrt();
        let ak = T::from_f64(K_FPI) * ak / (tol * a2.sqrt());
        let aa = T::from_f64(fit.aa_scale) * angle / (one + caz);
        let bb = T::from_f64(fit.bb_scale) * angle / (T::from_f64(fit.bb_shift) + caz);
        let ak = (ak.ln() + caz * aa.cos() / (one + T::from_f64(fit.damping) * caz)) / bb.cos();
        T::from_f64(fit.quad) * ak * ak / caz + T::from_f64(fit.offset)
    };

    let k = fk.trunc_i32();
    let mut fk = T::from_f64(f64::from(k));
    let mut fks = fk * fk;
    let mut p1 = Complex::new(zero, zero);
    let mut p2 = Complex::new(tol, zero);
    let mut cs = p2;
    for _ in 0..k {
        let a1 = fks - fk;
        let a = (fks + fk) / (a1 + fhs);
        let rak = two / (fk + one);
        let cb = Complex::new((fk + z.re) * rak, z.im * rak);
        let pt = p2;
        p2 = (pt * cb - p1) * a;
        p1 = pt;
        cs = cs + p2;
        fks = a1 - fk + one;
        fk = fk - one;
    }
    Ok((p1, p2, cs))
}

/// Forward recurrence from `K_dnu`, `K_{dnu+1}` to the requested orders.
fn climb<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    dnu: T,
    inu: i32,
    n: usize,
    s1: Complex<T>,
    s2: Complex<T>,
    level: usize,
    underflow_guard: bool,
    rz: Complex<T>,
    lim: &Limits<T>,
    levels: &ScaleLevels<T>,
) -> Evaluation<T> {
    let mut state = Climb {
        s1,
        s2,
        ck: rz * (dnu + T::one()),
        level,
    };
    let steps = if n == 1 { inu - 1 } else { inu };
    let mut zd = z;
    let mut first = 1;

    if steps > 0 && underflow_guard {
        match scaled_climb(&mut state, &mut zd, steps, rz, lim) {
            Some(next) => {
                state.level = 0;
                first = next;
            }
            None => {
                if n == 1 {
                    state.s1 = state.s2;
                }
                return finish_rescaled(zd, fnu, n, state.s1, state.s2, rz, lim, levels);
            }
        }
    } else if steps <= 0 && underflow_guard {
        if n == 1 {
            state.s1 = state.s2;
        }
        return finish_rescaled(zd, fnu, n, state.s1, state.s2, rz, lim, levels);
    }

    for _ in first..=steps {
        state.step(rz, levels);
    }
    if n == 1 {
        state.s1 = state.s2;
    }
    Evaluation::complete(state.emit(n, rz, levels))
}

/// Recurrence at `exp(z)` scale until two consecutive values are back on
/// scale.
///
/// On success the state holds that pair (at scale 1/tol) and the 1-based
/// step to resume from is returned. Otherwise the state and `zd` are left as
/// the recurrence ended, ready for the rescaling manager.
fn scaled_climb<T: BesselFloat>(
    state: &mut Climb<T>,
    zd: &mut Complex<T>,
    steps: i32,
    rz: Complex<T>,
    lim: &Limits<T>,
) -> Option<i32> {
    let helim = T::from_f64(0.5) * lim.elim;
    let shrink = (-lim.elim).exp();
    let czero = Complex::new(T::zero(), T::zero());
    let mut last = -1;
    let mut pair = [czero; 2];
    let mut j = 1;

    for i in 1..=steps {
        let prev = state.s2;
        state.s2 = state.ck * prev + state.s1;
        state.s1 = prev;
        state.ck = state.ck + rz;

        let (on_scale, alas) = unscale(state.s2, *zd, lim.tol, lim.elim, lim.ascle);
        if let Some(v) = on_scale {
            j = 1 - j;
            pair[j] = v;
            if last == i - 1 {
                state.s2 = pair[j];
                state.s1 = pair[1 - j];
                tracing::debug!(step = i, "K: recurrence back on scale");
                return Some(i + 1);
            }
            last = i;
            continue;
        }
        if alas >= helim {
            zd.re = zd.re - lim.elim;
            state.s1 = state.s1 * shrink;
            state.s2 = state.s2 * shrink;
        }
    }
    None
}

/// Hand an `exp(zd)`-scaled pair to the rescaling manager and finish the
/// sequence from the first two survivors.
fn finish_rescaled<T: BesselFloat>(
    zd: Complex<T>,
    fnu: T,
    n: usize,
    s1: Complex<T>,
    s2: Complex<T>,
    rz: Complex<T>,
    lim: &Limits<T>,
    levels: &ScaleLevels<T>,
) -> Evaluation<T> {
    let czero = Complex::new(T::zero(), T::zero());
    let mut y = vec![czero; n];
    y[0] = s1;
    if n > 1 {
        y[1] = s2;
    }

    let Evaluation {
        values: mut y,
        underflow: nz,
    } = rescale_k(zd, fnu, y, rz, lim.ascle, lim.tol, lim.elim);
    let left = n - nz;
    if left == 0 {
        return Evaluation { values: y, underflow: nz };
    }

    let kk = nz;
    let s1 = y[kk];
    y[kk] = s1 * levels.csr[0];
    if left == 1 {
        return Evaluation { values: y, underflow: nz };
    }
    let s2 = y[kk + 1];
    y[kk + 1] = s2 * levels.csr[0];
    if left == 2 {
        return Evaluation { values: y, underflow: nz };
    }

    let mut state = Climb {
        s1,
        s2,
        ck: rz * (fnu + T::from_f64((kk + 1) as f64)),
        level: 0,
    };
    for slot in y.iter_mut().skip(kk + 2) {
        *slot = state.step(rz, levels);
    }
    Evaluation { values: y, underflow: nz }
}
