//! Numerical kernels behind the Airy dispatcher.
//!
//! Everything here is `pub(crate)`. The routines follow Amos Algorithm 644
//! (TOMS 644) closely enough to reproduce its results to rounding, but each
//! evaluator owns its output: it allocates the sequence it fills and hands it
//! back in an [`Evaluation`], and callers decide what to do on failure.
//!
//! # Underflow convention
//!
//! `Evaluation::underflow` counts entries replaced by exact zero. Overflow
//! and iteration-cap exhaustion are `Err(Error::Overflow)` and
//! `Err(Error::ConvergenceFailure)`. The series evaluator has one more
//! outcome, a hand-off to another method, expressed by
//! [`series::SeriesOutcome`].
//!
//! # Clippy
//!
//! Several modules allow `excessive_precision` (constants are transcribed at
//! the published precision) and `too_many_arguments` (evaluators take the
//! argument, order, scaling, count and limits separately).

use alloc::vec;
use alloc::vec::Vec;

use num_complex::Complex;

use crate::machine::BesselFloat;

pub(crate) mod thresholds;

// scale bookkeeping
pub(crate) mod combine;
pub(crate) mod rescale;
pub(crate) mod underflow;

pub(crate) mod gamma;

// I in the principal sector
pub(crate) mod asymptotic;
pub(crate) mod bessel_i;
pub(crate) mod miller;
pub(crate) mod ratios;
pub(crate) mod series;

// K and its continuation
pub(crate) mod bessel_k;
pub(crate) mod continuation;

/// A sequence of values for consecutive orders plus its underflow count.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Evaluation<T> {
    pub values: Vec<Complex<T>>,
    pub underflow: usize,
}

impl<T: BesselFloat> Evaluation<T> {
    /// `n` zeros, all counted as underflowed.
    pub(crate) fn vanished(n: usize) -> Self {
        Evaluation {
            values: vec![Complex::new(T::zero(), T::zero()); n],
            underflow: n,
        }
    }

    pub(crate) fn complete(values: Vec<Complex<T>>) -> Self {
        Evaluation {
            values,
            underflow: 0,
        }
    }
}
