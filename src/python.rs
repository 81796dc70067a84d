#![cfg(not(doctest))]

// Do not run doctests, since otherwise Rust attempts to build the Python
// examples as Rust code. There are no Rust doctests in this module, so the
// easiest solution is to disable doctests.

use crate::{
    Band, BandSpec, Initialization, MinimaxParameters, ParametersBuilder, error::Error,
};
use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
};

/// minimax-fir designs equiripple linear-phase lowpass and highpass FIR
/// filters with a multiple exchange algorithm on a dense frequency grid. It can
/// be used as a Rust library and as a Python package via its Python bindings.
#[pymodule]
fn minimax_fir(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(minimax, m)?)?;
    m.add_class::<MinimaxDesign>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("__license__", env!("CARGO_PKG_LICENSE"))?;
    Ok(())
}

/// Calculate the minimax optimal lowpass or highpass FIR filter.
///
/// Calculate the coefficients of the odd length, even-symmetric finite impulse
/// response (FIR) filter that minimizes the maximum weighted error between the
/// desired gain and the realized gain in the passband and the stopband. The
/// transition band between them is a dead zone in which the error is not
/// constrained. The filter is a lowpass if the transition band begins where
/// the passband ends, and a highpass if the transition band ends where the
/// passband begins.
///
/// Parameters
/// ----------
/// length : int
///     The number of taps in the filter. It must be odd and at least 3.
/// passband : tuple of float
///     The edges of the passband. A lowpass passband must begin at 0, and
///     a highpass passband must end at 0.5 (normalized frequency).
/// transition : tuple of float
///     The edges of the transition band.
/// weight : tuple of float, optional
///     The weights of the passband and the stopband. Default is ``(1.0, 1.0)``.
/// grid_interval : float, optional
///     The spacing of the frequency grid, which is also the convergence
///     tolerance. Default is 1e-4.
/// seed : int, optional
///     The seed used to draw the initial extremal frequencies. Default is 0.
/// maxiter : int, optional
///     Maximum number of iterations of the algorithm. Default is 100.
/// initialization : {'random', 'uniform'}, optional
///     How the initial extremal frequencies are chosen. Default is random.
///
/// Returns
/// -------
/// design : MinimaxDesign
///     The filter design. Its ``impulse_response`` attribute contains the
///     coefficients of the optimal FIR filter.
///
/// Raises
/// ------
/// ValueError
///     If the filter specification is invalid.
/// RuntimeError
///     If the algorithm fails numerically or does not converge. Another
///     ``seed`` can be tried in this case.
#[allow(clippy::too_many_arguments)]
#[pyfunction]
#[pyo3(signature = (length, passband, transition, *, weight=(1.0, 1.0), grid_interval=1e-4, seed=0, maxiter=100, initialization="random"))]
fn minimax(
    length: usize,
    passband: (f64, f64),
    transition: (f64, f64),
    weight: (f64, f64),
    grid_interval: f64,
    seed: u64,
    maxiter: usize,
    initialization: &str,
) -> PyResult<MinimaxDesign> {
    let initialization = match initialization {
        "random" => Initialization::Random,
        "uniform" => Initialization::Uniform,
        _ => {
            return Err(PyValueError::new_err(
                "initialization must be \"random\" or \"uniform\"",
            ));
        }
    };
    let bands = BandSpec::new(
        Band::new(passband.0, passband.1)?,
        Band::new(transition.0, transition.1)?,
    )?;
    let mut params = MinimaxParameters::new(length, bands);
    params
        .set_weights(weight.0, weight.1)
        .set_grid_interval(grid_interval)
        .set_seed(seed)
        .set_max_iterations(maxiter)
        .set_initialization(initialization);
    Ok(MinimaxDesign(crate::minimax_design(&params)?))
}

#[derive(Debug, Clone)]
#[pyclass]
struct MinimaxDesign(crate::MinimaxDesign<f64>);

#[pymethods]
impl MinimaxDesign {
    #[getter]
    fn get_impulse_response(&self) -> Vec<f64> {
        self.0.impulse_response.clone()
    }

    #[getter]
    fn get_max_error(&self) -> f64 {
        self.0.max_error
    }

    #[getter]
    fn get_ripple(&self) -> f64 {
        self.0.ripple
    }

    #[getter]
    fn get_extremal_freqs(&self) -> Vec<f64> {
        self.0.extremal_freqs.clone()
    }

    #[getter]
    fn get_num_iterations(&self) -> usize {
        self.0.num_iterations
    }

    #[getter]
    fn get_error_history(&self) -> Vec<f64> {
        self.0.error_history.clone()
    }

    /// Evaluate the zero-phase frequency response at the normalized
    /// frequency ``f``.
    fn frequency_response(&self, f: f64) -> f64 {
        self.0.frequency_response(f)
    }

    fn __repr__(&self) -> String {
        format!(
            "MinimaxDesign(impulse_response={:?}, max_error={}, ripple={}, \
             extremal_freqs={:?}, num_iterations={})",
            self.0.impulse_response,
            self.0.max_error,
            self.0.ripple,
            self.0.extremal_freqs,
            self.0.num_iterations,
        )
    }
}

impl From<Error> for PyErr {
    fn from(error: Error) -> PyErr {
        match error {
            Error::InvalidSpecification(_) => PyValueError::new_err(error.to_string()),
            Error::SingularSystem(_)
            | Error::ExtremalSetUndersized { .. }
            | Error::ExtremalSetUnprunable { .. }
            | Error::InitializationExhausted { .. }
            | Error::NonConvergence(_) => PyRuntimeError::new_err(error.to_string()),
        }
    }
}
