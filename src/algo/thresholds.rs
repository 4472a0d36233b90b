//! Algorithm-selection thresholds and fixed numerical constants.
//!
//! Every empirically tuned limit that decides which evaluator runs, or how
//! long it may iterate, lives here so it can be audited against the values
//! published with TOMS 644. They are normative: the kernels reproduce the
//! reference library only when these match it exactly.

#![allow(clippy::excessive_precision)]
#![allow(clippy::approx_constant)]

// ── Mathematical constants ──

pub(crate) const PI: f64 = 3.14159265358979324e+00;
pub(crate) const HALF_PI: f64 = 1.57079632679489662e+00;
pub(crate) const TWO_THIRDS: f64 = 6.66666666666666667e-01;
/// sqrt(π/2)
pub(crate) const SQRT_HALF_PI: f64 = 1.25331413731550025e+00;
/// 1/(2π)
pub(crate) const INV_TWO_PI: f64 = 1.59154943091895336e-01;
pub(crate) const SQRT_2: f64 = 1.41421356237309505e+00;
/// log10(2), D1MACH(5) on binary machines.
pub(crate) const LOG10_2: f64 = 0.30102999566398120;

// ── Machine-limit derivation ──

/// ln(10) rounded as in the reference: exponent limits are `2.303 * decades`.
pub(crate) const ELIM_LN10: f64 = 2.303;
/// Decimal digits are capped at 18 when deriving `rl` and `fnul`.
pub(crate) const PRECISION_DIGITS_CAP: f64 = 18.0;
/// Underflow floor factor: `ascle = 1e3 * tiny / tol`.
pub(crate) const ASCLE_FACTOR: f64 = 1.0e3;
/// Half of the largest 32-bit integer; caps the Airy range test.
pub(crate) const INT_RANGE_CAP: f64 = 1073741823.5;

// ── Airy dispatcher ──

/// |z| at or below which Ai is summed directly from its Maclaurin series.
pub(crate) const AIRY_SERIES_RADIUS: f64 = 1.0;
/// Iteration cap on the z³ power series.
pub(crate) const AIRY_SERIES_TERMS: usize = 25;
/// Ai(0) = 3^(-2/3)/Γ(2/3)
pub(crate) const AI_ZERO: f64 = 3.55028053887817240e-01;
/// -Ai'(0) = 3^(-1/3)/Γ(1/3)
pub(crate) const AI_PRIME_ZERO: f64 = 2.58819403792806799e-01;
/// 1/(π√3), the K-to-Ai conversion factor.
pub(crate) const AIRY_K_COEF: f64 = 1.83776298473930683e-01;

// ── Principal-sector I dispatch ──

/// The power series is always tried for |z| at or below this.
pub(crate) const I_SERIES_RADIUS: f64 = 2.0;

// ── Bessel-K kernel ──

/// Temme's series is used for |z| at or below this (R1).
pub(crate) const K_SERIES_RADIUS: f64 = 2.0;
/// Cap on the forward recurrence that locates the Miller start index.
pub(crate) const K_START_INDEX_MAX_ITER: usize = 30;
/// Below this |dnu| the Chebyshev expansion replaces the direct g1 formula.
pub(crate) const K_SMALL_DNU: f64 = 0.1;
/// 6/π
pub(crate) const K_SPI: f64 = 1.90985931710274403e+00;
/// 2^(7/4)/sqrt(π)
pub(crate) const K_FPI: f64 = 1.89769999331517738e+00;
/// 1/log10(2), converts decimal digits back to bits.
pub(crate) const K_BITS_PER_DECADE: f64 = 3.321928094;
/// Clamp on the bit count used to place the ratio/series crossover.
pub(crate) const K_DIGIT_CLAMP: (f64, f64) = (12.0, 60.0);
/// Coefficients of the empirical start-index fit for |z| below the crossover.
pub(crate) const K_INDEX_FIT: KIndexFit = KIndexFit {
    aa_scale: 3.0,
    bb_scale: 14.7,
    bb_shift: 28.0,
    damping: 0.008,
    quad: 0.12125,
    offset: 1.5,
};

/// Coefficients of the start-index fit used when |z| is below the
/// crossover computed from the machine precision.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KIndexFit {
    pub aa_scale: f64,
    pub bb_scale: f64,
    pub bb_shift: f64,
    pub damping: f64,
    pub quad: f64,
    pub offset: f64,
}

/// Chebyshev coefficients of g1(dnu) for |dnu| ≤ 0.1; the first is Euler's γ.
#[rustfmt::skip]
pub(crate) const TEMME_G1: [f64; 8] = [
    5.77215664901532861e-01,
   -4.20026350340952355e-02,
   -4.21977345555443367e-02,
    7.21894324666309954e-03,
   -2.15241674114950973e-04,
   -2.01348547807882387e-05,
    1.13302723198169588e-06,
    6.11609510448141582e-09,
];

// ── Miller algorithm ──

/// Cap on each of the two forward sweeps that choose the start index.
pub(crate) const MILLER_MAX_ITER: i32 = 80;
