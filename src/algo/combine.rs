//! Connection-formula combiner for the scaled continuation sum.
//!
//! In the exponentially scaled continuation `y = cspn·K(ν, zn) + csgn·I(ν, zn)`
//! the K part carries a factor `exp(zn)` and the I part `exp(-|Re zn|)`.
//! Before the two are added the K part is moved onto the I part's reference
//! by multiplying with `exp(-2 zn)`, in logarithmic form so neither the
//! product nor the intermediate overflows.

use num_complex::Complex;

use crate::machine::BesselFloat;
use crate::utils::modulus;

/// The two contributions after being placed on a common scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Combined<T> {
    /// K contribution, now scaled like `s2`; zero when it was negligible.
    pub s1: Complex<T>,
    /// I contribution, unchanged unless both parts vanished.
    pub s2: Complex<T>,
    /// Both parts fell below the underflow floor and were replaced by zero.
    pub underflow: bool,
}

/// Rescale `s1` by `exp(-2 zr)` and test the pair for joint underflow.
///
/// `rescaled` counts how many consecutive orders needed their K part kept
/// after rescaling; the caller threads it through its order loop and uses it
/// to decide when the K recurrence must restart from combined values. A
/// joint underflow resets it to zero.
pub(crate) fn combine<T: BesselFloat>(
    zr: Complex<T>,
    s1: Complex<T>,
    s2: Complex<T>,
    ascle: T,
    alim: T,
    rescaled: &mut i32,
) -> Combined<T> {
    let zero = Complex::new(T::zero(), T::zero());
    let mut k_part = zero;
    let mut as1 = T::zero();

    let a = modulus(s1);
    if a != T::zero() {
        let aln = -zr.re - zr.re + a.ln();
        if aln >= -alim {
            k_part = (s1.ln() - (zr + zr)).exp();
            as1 = modulus(k_part);
            *rescaled += 1;
        }
    }

    if as1.max(modulus(s2)) > ascle {
        return Combined {
            s1: k_part,
            s2,
            underflow: false,
        };
    }
    *rescaled = 0;
    Combined {
        s1: zero,
        s2: zero,
        underflow: true,
    }
}
