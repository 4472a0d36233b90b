//! Public result, option and error types.

use alloc::vec::Vec;

use num_complex::Complex;

use crate::machine::BesselFloat;

/// Precision status of a successful computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accuracy {
    /// Full machine precision is expected.
    Normal,
    /// |z| (or ν) is large enough that more than half of the significant
    /// digits may be lost to argument reduction.
    Reduced,
}

/// Exponential scaling option.
///
/// The scaled form returned under [`Scaling::Exponential`] is:
/// - I: `exp(-|Re z|) · I_ν(z)`
/// - K: `exp(z) · K_ν(z)`
/// - Ai, Ai': `exp(ζ) · Ai(z)` with `ζ = (2/3) z^(3/2)`
///
/// Undoing the scaling, when the unscaled value is representable, is the
/// caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scaling {
    /// Raw function values.
    #[default]
    Unscaled,
    /// Values pre-multiplied by the decaying exponential above.
    Exponential,
}

/// Ai(z) or Ai'(z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiryDerivative {
    /// Ai(z).
    Value,
    /// Ai'(z).
    Derivative,
}

impl AiryDerivative {
    /// 0 for the value, 1 for the derivative.
    pub(crate) fn order<T: BesselFloat>(self) -> T {
        match self {
            AiryDerivative::Value => T::zero(),
            AiryDerivative::Derivative => T::one(),
        }
    }
}

/// Result of [`airy`](crate::airy).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiryResult<T: BesselFloat> {
    /// Ai(z) or Ai'(z), scaled as requested.
    pub value: Complex<T>,
    /// 1 when the value underflowed and was replaced by exact zero, else 0.
    pub underflow_count: usize,
    /// Precision status.
    pub status: Accuracy,
}

/// Result of a sequence evaluation such as [`besselk_seq`](crate::besselk_seq).
#[derive(Debug, Clone, PartialEq)]
pub struct BesselResult<T: BesselFloat> {
    /// Values for orders ν, ν+1, …, ν+n-1.
    pub values: Vec<Complex<T>>,
    /// Number of entries replaced by exact zero because they underflowed.
    ///
    /// For K these are the leading entries, for I the trailing ones.
    pub underflow_count: usize,
    /// Precision status.
    pub status: Accuracy,
}

/// Failure of an Airy or Bessel evaluation.
///
/// Underflow is not an error: it is reported through `underflow_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The starting order ν was negative (or NaN).
    #[error("invalid input: order must be non-negative")]
    NegativeOrder,
    /// A sequence of zero orders was requested.
    #[error("invalid input: sequence length must be at least 1")]
    EmptySequence,
    /// K_ν is singular at z = 0.
    #[error("invalid input: K is undefined at z = 0")]
    ZeroArgument,
    /// The last requested order exceeds the range of the implemented methods.
    #[error("order too large: large-order uniform expansions are not implemented")]
    OrderTooLarge,
    /// The result magnitude exceeds the representable range.
    #[error("overflow: result magnitude exceeds representable range")]
    Overflow,
    /// |z| or ν is so large that no significant digits remain.
    #[error("total precision loss: no significant digits remain")]
    TotalPrecisionLoss,
    /// Every applicable algorithm exhausted its iteration cap.
    #[error("convergence failure: algorithm did not meet termination criteria")]
    ConvergenceFailure,
}
