//! Underflow test for one scaled complex value.

use num_complex::Complex;

use crate::machine::BesselFloat;

/// Whether `y`, a value carried at scale 1/`tol`, has lost its phase.
///
/// True when the smaller component is at or below `ascle` and the larger one
/// is under `smaller / tol`: once brought back to its proper scale the
/// smaller part would vanish and the argument of the value would be noise.
/// The input is never modified.
#[inline]
pub(crate) fn is_underflow<T: BesselFloat>(y: Complex<T>, ascle: T, tol: T) -> bool {
    let (wr, wi) = (y.re.abs(), y.im.abs());
    let smaller = wr.min(wi);
    smaller <= ascle && wr.max(wi) < smaller / tol
}
