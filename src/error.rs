//! Error types used by `minimax_fir`.

use thiserror::Error;

/// `minimax_fir` `Result` type.
pub type Result<T> = core::result::Result<T, Error>;

/// `minimax_fir` error.
///
/// This enum represents all the errors that can be produced by `minimax_fir`.
/// Every error aborts the design call that produced it.
#[derive(Error, Debug)]
pub enum Error {
    /// The filter specification is invalid.
    ///
    /// This error is reported before any computation is performed.
    #[error("invalid specification: {0}")]
    InvalidSpecification(InvalidSpecification),
    /// The interpolation system is singular or ill-conditioned for the current
    /// extremal set.
    #[error("interpolation system is singular: {0}")]
    SingularSystem(String),
    /// Fewer than k + 2 extrema of the weighted error were found in an
    /// iteration.
    #[error("only {found} weighted error extrema found, {required} are required")]
    ExtremalSetUndersized {
        /// Number of extrema found.
        found: usize,
        /// Number of extrema required (k + 2).
        required: usize,
    },
    /// More than k + 2 extrema of the weighted error were found, and none of
    /// the boundary frequencies that may be discarded is among them.
    #[error(
        "{found} weighted error extrema found, but no boundary extremum can be \
         discarded to leave {required}"
    )]
    ExtremalSetUnprunable {
        /// Number of extrema remaining when pruning got stuck.
        found: usize,
        /// Number of extrema required (k + 2).
        required: usize,
    },
    /// The initial extremal set could not be drawn within the redraw limit.
    #[error("unable to draw an admissible initial extremal set in {attempts} attempts")]
    InitializationExhausted {
        /// Number of draws attempted for the offending candidate.
        attempts: usize,
    },
    /// The maximum number of iterations was reached without convergence.
    #[error(
        "no convergence after {} iterations (best maximum error {})",
        .0.num_iterations,
        .0.best_max_error
    )]
    NonConvergence(Box<NonConvergence>),
}

/// Invalid specification error.
///
/// This enum classifies the ways in which the input of a design can be
/// invalid.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum InvalidSpecification {
    /// The filter length is even.
    #[error("the filter length must be odd")]
    EvenLength,
    /// The filter length is smaller than 3.
    #[error("the filter length must be at least 3")]
    LengthTooShort,
    /// The band limits are out of bounds.
    #[error("band limits out of bounds")]
    BandLimitsOutOfBounds,
    /// The begin of the band is greater than the end of the band.
    #[error("band begin is greater than band end")]
    BandLimitsWrongOrder,
    /// The passband contains a single frequency.
    #[error("the passband is a single point")]
    DegeneratePassband,
    /// The transition band contains a single frequency.
    #[error("the transition band is a single point")]
    DegenerateTransition,
    /// The transition band is not adjacent to the passband.
    #[error("the transition band must begin where the passband ends or end where it begins")]
    NotAdjacent,
    /// The bands do not describe a single passband/stopband pair.
    #[error(
        "a lowpass passband must begin at 0 and a highpass passband must end at 0.5"
    )]
    NotSingleBandPair,
    /// A weight is zero, negative or not finite.
    #[error("weights must be positive and finite")]
    NonPositiveWeight,
    /// The grid interval is not a small positive number.
    #[error("the grid interval must be positive, finite and at most 0.5")]
    InvalidGridInterval,
    /// The grid has fewer admissible points than the extremal set needs.
    #[error("the frequency grid has {available} admissible points, {required} are required")]
    GridTooCoarse {
        /// Number of grid points outside the transition band.
        available: usize,
        /// Number of points required (k + 2).
        required: usize,
    },
    /// The maximum number of iterations is zero.
    #[error("the maximum number of iterations must be positive")]
    ZeroIterations,
    /// The convergence tolerance is not positive.
    #[error("the convergence tolerance must be positive and finite")]
    NonPositiveTolerance,
}

impl From<InvalidSpecification> for Error {
    fn from(value: InvalidSpecification) -> Error {
        Error::InvalidSpecification(value)
    }
}

/// Diagnostics attached to [`Error::NonConvergence`].
///
/// The values are converted to `f64` so that the error type does not depend
/// on the scalar used for the design.
#[derive(Debug, Clone, PartialEq)]
pub struct NonConvergence {
    /// Number of iterations performed.
    pub num_iterations: usize,
    /// Maximum weighted error of each iteration.
    pub error_history: Vec<f64>,
    /// Smallest maximum weighted error seen in any iteration.
    pub best_max_error: f64,
    /// Impulse response of the iteration with the smallest maximum error.
    pub best_impulse_response: Vec<f64>,
}
