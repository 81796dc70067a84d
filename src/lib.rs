//! # Equiripple minimax FIR design
//!
//! The [`minimax_fir`](crate) crate designs linear-phase lowpass and highpass
//! FIR filters that minimize the maximum weighted error between the desired
//! response and the realized response. The filters have an odd number of taps
//! and even symmetry. The design uses a multiple exchange algorithm on a
//! dense frequency grid: an interpolation system is solved for a cosine-series
//! model at the current extremal frequencies, the weighted error is evaluated
//! over the whole grid, and the extremal frequencies are replaced by the local
//! extrema of this error, until the maximum error stops decreasing.
//!
//! All the calculations are generic over the scalar type, which must implement
//! the [`Float`] and [`FloatConst`] traits. The linear systems are solved by a
//! [`LinearSolverBackend`].
//!
//! ## Examples
//!
//! The main function of this crate is [`minimax_design`], which takes a
//! [`DesignParameters`] object defining the filter to be constructed and
//! returns a [`MinimaxDesign`] struct containing the filter taps and other
//! information.
//!
//! The following designs a lowpass filter with a passband `[0.0, 0.2]` and a
//! stopband `[0.3, 0.5]`. The band between the passband and the stopband is a
//! transition band in which the error is not constrained. The stopband is
//! given a weight of 0.6 relative to the passband, so the stopband ripple is
//! allowed to be larger.
//!
//! ```
//! # #[cfg(any(feature = "lapack-backend", feature = "faer-backend", feature = "nalgebra-backend"))]
//! # fn main() -> Result<(), minimax_fir::error::Error> {
//! use minimax_fir::{ParametersBuilder, lowpass, minimax_design};
//! let mut parameters = lowpass(17, 0.2, 0.3)?;
//! parameters.set_weights(1.0, 0.6).set_grid_interval(1e-3);
//! let design = minimax_design(&parameters)?;
//! assert_eq!(design.impulse_response.len(), 17);
//! # Ok(())
//! # }
//! # #[cfg(not(any(feature = "lapack-backend", feature = "faer-backend", feature = "nalgebra-backend")))]
//! # fn main() {}
//! ```
//!
//! The initial extremal frequencies are drawn pseudorandomly from a generator
//! with a fixed seed, so the design is reproducible. Some initial sets lead
//! to a numerical failure. In that case, trying a different seed with
//! [`ParametersBuilder::set_seed`], or a deterministic initialization with
//! [`ParametersBuilder::set_initialization`], usually solves the problem.
//!
//! The band specification can also be given with a [`BandSpec`] constructed
//! from two [`Band`]s. This designs a highpass filter.
//!
//! ```
//! # #[cfg(any(feature = "lapack-backend", feature = "faer-backend", feature = "nalgebra-backend"))]
//! # fn main() -> Result<(), minimax_fir::error::Error> {
//! use minimax_fir::{
//!     Band, BandSpec, FilterKind, Initialization, MinimaxParameters, ParametersBuilder,
//!     minimax_design,
//! };
//! let bands = BandSpec::new(Band::new(0.3, 0.5)?, Band::new(0.2, 0.3)?)?;
//! assert_eq!(bands.kind(), FilterKind::Highpass);
//! let mut parameters = MinimaxParameters::new(21, bands);
//! parameters
//!     .set_grid_interval(1e-3)
//!     .set_initialization(Initialization::Uniform);
//! let design = minimax_design(&parameters)?;
//! println!("maximum weighted error {}", design.max_error);
//! # Ok(())
//! # }
//! # #[cfg(not(any(feature = "lapack-backend", feature = "faer-backend", feature = "nalgebra-backend")))]
//! # fn main() {}
//! ```
//!
//! ## Building
//!
//! The `minimax_fir` crate supports different backends to solve linear
//! systems. These are selected with feature flags. See [`LinearSolverBackend`]
//! for more details. By default, only the faer backend is enabled, which is a
//! pure Rust implementation.
//!
//! Another supported backend uses `ndarray_linalg` to solve linear systems
//! with LAPACK. It is enabled with the `lapack-backend` feature flag. Exactly
//! one of the features `openblas-static`, `openblas-system`, `netlib-static`,
//! `netlib-system`, `intel-mkl-static` and `intel-mkl-system` needs to be
//! enabled to select how LAPACK is linked. The `-static` versions of each flag
//! build the LAPACK backend and link statically against it. The `-system`
//! versions link against a system-installed library.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade. The maximum weighted error of
//! each iteration is logged at the debug level and the extremal set chosen by
//! each exchange at the trace level.

#![warn(missing_docs)]

use num_traits::{Float, FloatConst};

mod checks;
use checks::check_parameters;
mod chebyshev;
mod controller;
use controller::{BestIteration, ExchangeState, Progress};
pub mod error;
use error::{Error, InvalidSpecification, NonConvergence, Result};
mod extrema;
use extrema::exchange;
mod grid;
use grid::FrequencyGrid;
mod initial;
use initial::initial_extremal_set;
mod interpolation;
use interpolation::solve_interpolation_with_retry;
#[cfg(feature = "lapack-backend")]
mod lapack;
#[cfg(feature = "lapack-backend")]
pub use lapack::{IsLapack, ToLapack};
#[cfg(all(
    feature = "python",
    any(
        feature = "faer-backend",
        feature = "lapack-backend",
        feature = "nalgebra-backend"
    )
))]
mod python;
mod requirements;
pub use requirements::{highpass, lowpass};
mod response;
use response::weighted_error;
mod solver;
#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
pub use solver::DefaultLinearSolver;
#[cfg(feature = "faer-backend")]
pub use solver::FaerBackend;
#[cfg(feature = "lapack-backend")]
pub use solver::LapackBackend;
#[cfg(feature = "nalgebra-backend")]
pub use solver::NalgebraBackend;
pub use solver::{LinearSolverBackend, SolveError};
mod taps;
use taps::impulse_response;
mod types;
pub use types::{
    Band, BandSpec, DesignParameters, FilterKind, Initialization, MinimaxDesign,
    MinimaxParameters, ParametersBuilder,
};

/// Minimax FIR design by multiple exchange.
///
/// This function runs the exchange algorithm to find the odd length, even
/// symmetric FIR filter that minimizes the maximum weighted error over the
/// passband and the stopband, according to the configuration parameters given
/// in the `parameters` argument.
///
/// The type parameter `T` represents the scalar used internally in all the
/// computations. The type parameter `P` represents the type of the design
/// parameters, which needs to implement the [`DesignParameters`] trait.
///
/// This function uses the [`DefaultLinearSolver`] to solve the interpolation
/// systems. The backend that is selected as default backend depends on the
/// feature flags. Use [`minimax_design_with_backend`] to specify a particular
/// linear solver backend.
///
/// # Errors
///
/// An [`Error::InvalidSpecification`] is returned before any computation if
/// the parameters are invalid. The remaining errors are numerical failures of
/// a particular run, and they can often be avoided by choosing a different
/// seed for the initial extremal set.
///
/// # Examples
///
/// See the [crate-level examples](crate#examples).
#[cfg(any(
    feature = "lapack-backend",
    feature = "faer-backend",
    feature = "nalgebra-backend"
))]
pub fn minimax_design<T, P>(parameters: &P) -> Result<MinimaxDesign<T>>
where
    T: Float + FloatConst,
    P: DesignParameters<T>,
    DefaultLinearSolver: LinearSolverBackend<T>,
{
    minimax_design_with_backend(parameters, &DefaultLinearSolver::default())
}

/// Minimax FIR design by multiple exchange with linear solver backend.
///
/// This function behaves like [`minimax_design`], but it additionally allows
/// a linear solver backend to be specified. The backend must support the
/// scalar type `T` that is used. See the [`LinearSolverBackend`] trait for
/// more details.
pub fn minimax_design_with_backend<T, P, B>(
    parameters: &P,
    linear_solver: &B,
) -> Result<MinimaxDesign<T>>
where
    T: Float + FloatConst,
    P: DesignParameters<T>,
    B: LinearSolverBackend<T>,
{
    let num_intervals = check_parameters(parameters)?;
    let length = parameters.length();
    // Number of cosine functions besides the constant (k), and size of the
    // extremal set (k + 2).
    let num_cosines = (length - 1) / 2;
    let num_extremal = num_cosines + 2;

    let grid = FrequencyGrid::new(
        parameters.band_spec(),
        parameters.pass_weight(),
        parameters.stop_weight(),
        num_intervals,
    );
    let available = grid.admissible_count();
    if available < num_extremal {
        Err(InvalidSpecification::GridTooCoarse {
            available,
            required: num_extremal,
        })?
    }

    let mut extremal = initial_extremal_set(
        &grid,
        num_extremal,
        parameters.initialization(),
        parameters.seed(),
        parameters.max_redraws(),
    )?;
    log::trace!("initial extremal set {extremal:?}");

    let tolerance = parameters.tolerance();
    let max_iterations = parameters.max_iterations();
    let mut progress = Progress::new();
    let mut best = None;
    for iteration in 1..=max_iterations {
        let model = solve_interpolation_with_retry(
            &grid,
            &mut extremal,
            linear_solver,
            parameters.perturbation_retry(),
        )?;
        let error = weighted_error(&grid, &model.coefficients);
        log::debug!(
            "iteration {iteration}: maximum weighted error {}",
            to_f64(error.max_abs)
        );
        BestIteration::update(&mut best, error.max_abs, &model.coefficients);

        progress = match progress.record(error.max_abs, tolerance) {
            ExchangeState::Converged(progress) => {
                return Ok(MinimaxDesign {
                    impulse_response: impulse_response(&model.coefficients, length),
                    max_error: progress.max_error(),
                    ripple: model.ripple.abs(),
                    coefficients: model.coefficients,
                    extremal_freqs: extremal.iter().map(|&i| grid.freq(i)).collect(),
                    num_iterations: progress.num_iterations(),
                    error_history: progress.into_history(),
                });
            }
            ExchangeState::Iterating(progress) => progress,
        };

        if iteration < max_iterations {
            extremal = exchange(&grid, &error, num_extremal)?;
        }
    }

    log::warn!("no convergence after {max_iterations} iterations");
    let (best_max_error, best_impulse_response) = match best {
        Some(best) => (
            to_f64(best.max_error),
            impulse_response(&best.coefficients, length)
                .into_iter()
                .map(to_f64)
                .collect(),
        ),
        None => (f64::NAN, Vec::new()),
    };
    Err(Error::NonConvergence(Box::new(NonConvergence {
        num_iterations: progress.num_iterations(),
        error_history: progress.into_history().into_iter().map(to_f64).collect(),
        best_max_error,
        best_impulse_response,
    })))
}

fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
