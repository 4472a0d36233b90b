//! Complex Airy function Ai(z), Ai'(z) and the modified Bessel functions
//! I_ν(z), K_ν(z) behind it, following Amos Algorithm 644 (TOMS 644).
//!
//! All functions accept any complex argument and a real order ν ≥ 0. The
//! sequence evaluators return a run of consecutive orders ν, ν+1, …, ν+n-1
//! together with the number of entries that underflowed to zero.
//!
//! # Scaling
//!
//! [`Scaling::Exponential`] removes the dominant exponential factor so that
//! results stay representable far beyond the range where the plain values
//! overflow or underflow:
//!
//! | Function | Scaled value |
//! |----------|--------------|
//! | I_ν(z)   | `exp(-|Re z|) · I_ν(z)` |
//! | K_ν(z)   | `exp(z) · K_ν(z)` |
//! | Ai(z), Ai'(z) | `exp(ζ) · Ai(z)`, `ζ = (2/3) z^(3/2)` |
//!
//! # Example
//!
//! ```
//! use complex_airy::{ai, airy, AiryDerivative, Scaling};
//! use num_complex::Complex;
//!
//! let v = ai(Complex::new(1.0_f64, 0.0)).unwrap();
//! assert!((v.re - 0.1352924163128814).abs() < 1e-14);
//!
//! let r = airy(Complex::new(30.0_f64, 0.0), AiryDerivative::Value, Scaling::Exponential)
//!     .unwrap();
//! assert!(r.value.re > 0.0);
//! ```
//!
//! # Orders
//!
//! Large-order uniform expansions are not implemented. A sequence whose last
//! order exceeds [`Limits::fnul`] (about 86 for `f64`) is rejected with
//! [`Error::OrderTooLarge`].
//!
//! # Features
//!
//! - `std` (default): hardware FMA and `std` in the dependencies. Without it
//!   the crate is `no_std` and needs only `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod airy;
mod algo;
pub mod machine;
pub mod types;
mod utils;

pub use machine::{BesselFloat, Limits};
pub use types::{Accuracy, AiryDerivative, AiryResult, BesselResult, Error, Scaling};

use num_complex::Complex;

use crate::algo::bessel_i::i_sequence;
use crate::algo::bessel_k::bessel_k;
use crate::algo::continuation::{continue_k, Rotation};
use crate::algo::thresholds::{ASCLE_FACTOR, INT_RANGE_CAP};
use crate::utils::modulus;

// ── Airy ──

/// Airy function Ai(z) or its derivative Ai'(z), with scaling.
///
/// # Errors
/// - [`Error::Overflow`]: Re ζ is too negative for the unscaled value.
/// - [`Error::TotalPrecisionLoss`]: |z| is beyond the meaningful range.
/// - [`Error::ConvergenceFailure`]: an underlying Bessel evaluation failed.
pub fn airy<T: BesselFloat>(
    z: Complex<T>,
    deriv: AiryDerivative,
    scaling: Scaling,
) -> Result<AiryResult<T>, Error> {
    airy::airy(z, deriv, scaling, &Limits::machine())
}

/// Ai(z).
pub fn ai<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    airy(z, AiryDerivative::Value, Scaling::Unscaled).map(|r| r.value)
}

/// Ai'(z).
pub fn ai_prime<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    airy(z, AiryDerivative::Derivative, Scaling::Unscaled).map(|r| r.value)
}

// ── Sequences ──

/// Order and argument checks shared by I and K.
///
/// Returns `|z|` and the precision status, or the error that rules the
/// input out.
fn check_range<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    lim: &Limits<T>,
) -> Result<(T, Accuracy), Error> {
    if nu.is_nan() || nu < T::zero() {
        return Err(Error::NegativeOrder);
    }
    if n == 0 {
        return Err(Error::EmptySequence);
    }
    let az = modulus(z);
    let last = nu + T::from_f64((n - 1) as f64);
    let aa = (T::from_f64(0.5) / lim.tol).min(T::from_f64(INT_RANGE_CAP));
    if az > aa || last > aa {
        return Err(Error::TotalPrecisionLoss);
    }
    if last > lim.fnul {
        return Err(Error::OrderTooLarge);
    }
    let status = if az > aa.sqrt() || last > aa.sqrt() {
        Accuracy::Reduced
    } else {
        Accuracy::Normal
    };
    Ok((az, status))
}

/// I_{ν+j}(z) for j = 0, 1, …, n-1.
///
/// Underflowed entries are trailing; the left half plane is reached by
/// `I_ν(z) = e^{±iπν} I_ν(-z)`.
///
/// # Errors
/// - [`Error::NegativeOrder`], [`Error::EmptySequence`]: invalid input.
/// - [`Error::OrderTooLarge`]: ν+n-1 exceeds [`Limits::fnul`].
/// - [`Error::Overflow`], [`Error::TotalPrecisionLoss`],
///   [`Error::ConvergenceFailure`].
pub fn besseli_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    let lim = Limits::machine();
    let (_, status) = check_range(nu, z, n, &lim)?;
    let ev = i_sequence(z, nu, scaling, n, &lim)?;
    Ok(BesselResult {
        values: ev.values,
        underflow_count: ev.underflow,
        status,
    })
}

/// K_{ν+j}(z) for j = 0, 1, …, n-1.
///
/// Underflowed entries are leading. For Re z < 0 the values come from the
/// analytic continuation of the right half plane.
///
/// # Errors
/// - [`Error::NegativeOrder`], [`Error::EmptySequence`],
///   [`Error::ZeroArgument`]: invalid input.
/// - [`Error::OrderTooLarge`]: ν+n-1 exceeds [`Limits::fnul`].
/// - [`Error::Overflow`]: |z| is too small for the requested orders, or the
///   result is out of range.
/// - [`Error::TotalPrecisionLoss`], [`Error::ConvergenceFailure`].
pub fn besselk_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    let lim = Limits::machine();
    let (az, status) = check_range(nu, z, n, &lim)?;
    if az == T::zero() {
        return Err(Error::ZeroArgument);
    }

    if az < T::from_f64(ASCLE_FACTOR) * T::MACH_TINY {
        return Err(Error::Overflow);
    }
    let last = nu + T::from_f64((n - 1) as f64);
    if last > T::one() && az <= lim.tol {
        let aln = -(last * (T::from_f64(0.5) * az).ln());
        if aln > lim.elim {
            return Err(Error::Overflow);
        }
    }

    let ev = if z.re >= T::zero() {
        tracing::trace!(n, "K: right half plane");
        bessel_k(z, nu, scaling, n, &lim)?
    } else {
        tracing::trace!(n, "K: analytic continuation");
        continue_k(z, nu, scaling, Rotation::toward(z), n, &lim)?
    };
    Ok(BesselResult {
        values: ev.values,
        underflow_count: ev.underflow,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_agree_with_airy() {
        let z = Complex::new(0.4_f64, -1.3);
        let r = airy(z, AiryDerivative::Value, Scaling::Unscaled).unwrap();
        assert_eq!(ai(z).unwrap(), r.value);
        let r = airy(z, AiryDerivative::Derivative, Scaling::Unscaled).unwrap();
        assert_eq!(ai_prime(z).unwrap(), r.value);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let z = Complex::new(1.0_f64, 0.0);
        assert_eq!(besseli_seq(-1.0, z, 1, Scaling::Unscaled), Err(Error::NegativeOrder));
        assert_eq!(besseli_seq(f64::NAN, z, 1, Scaling::Unscaled), Err(Error::NegativeOrder));
        assert_eq!(besselk_seq(0.0, z, 0, Scaling::Unscaled), Err(Error::EmptySequence));
        assert_eq!(
            besselk_seq(0.0, Complex::new(0.0, 0.0), 1, Scaling::Unscaled),
            Err(Error::ZeroArgument)
        );
        assert_eq!(besselk_seq(90.0, z, 1, Scaling::Unscaled), Err(Error::OrderTooLarge));
        assert_eq!(besseli_seq(80.0, z, 10, Scaling::Unscaled), Err(Error::OrderTooLarge));
    }

    #[test]
    fn k_near_origin_overflows_for_large_orders() {
        let z = Complex::new(1e-300_f64, 0.0);
        assert_eq!(besselk_seq(3.0, z, 1, Scaling::Unscaled), Err(Error::Overflow));
    }

    #[test]
    fn f32_evaluation() {
        let v = ai(Complex::new(1.0_f32, 0.0)).unwrap();
        assert!((v.re - 0.135_292_42).abs() < 1e-5);
    }
}
