use crate::{
    error::{InvalidSpecification, Result},
    types::DesignParameters,
};
use num_traits::Float;

// Checks the design parameters that are not validated on construction.
//
// Returns the number of grid intervals N = round(1 / grid_interval).
pub fn check_parameters<T: Float, P: DesignParameters<T>>(parameters: &P) -> Result<usize> {
    let length = parameters.length();
    if length % 2 == 0 {
        Err(InvalidSpecification::EvenLength)?
    }
    if length < 3 {
        Err(InvalidSpecification::LengthTooShort)?
    }
    let zero = T::zero();
    for weight in [parameters.pass_weight(), parameters.stop_weight()] {
        if !(weight.is_finite() && weight > zero) {
            Err(InvalidSpecification::NonPositiveWeight)?
        }
    }
    let grid_interval = parameters.grid_interval();
    if !(grid_interval.is_finite() && grid_interval > zero)
        || grid_interval > T::from(0.5).unwrap()
    {
        Err(InvalidSpecification::InvalidGridInterval)?
    }
    let tolerance = parameters.tolerance();
    if !(tolerance.is_finite() && tolerance > zero) {
        Err(InvalidSpecification::NonPositiveTolerance)?
    }
    if parameters.max_iterations() == 0 {
        Err(InvalidSpecification::ZeroIterations)?
    }
    // grid intervals beyond usize are rejected as well
    let num_intervals = grid_interval
        .recip()
        .round()
        .to_usize()
        .filter(|&n| n > 0)
        .ok_or(InvalidSpecification::InvalidGridInterval)?;
    Ok(num_intervals)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::types::{BandSpec, MinimaxParameters, ParametersBuilder};

    fn params(length: usize) -> MinimaxParameters<f64> {
        MinimaxParameters::new(length, BandSpec::lowpass(0.2, 0.3).unwrap())
    }

    fn check(params: &MinimaxParameters<f64>) -> std::result::Result<usize, InvalidSpecification> {
        match check_parameters(params) {
            Ok(n) => Ok(n),
            Err(Error::InvalidSpecification(e)) => Err(e),
            Err(e) => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn valid_parameters() {
        assert_eq!(check(&params(17)), Ok(10_000));
        assert_eq!(check(params(3).set_grid_interval(0.3)), Ok(3));
    }

    #[test]
    fn invalid_length() {
        assert_eq!(check(&params(16)), Err(InvalidSpecification::EvenLength));
        assert_eq!(check(&params(1)), Err(InvalidSpecification::LengthTooShort));
    }

    #[test]
    fn invalid_weights() {
        for (pass, stop) in [(0.0, 1.0), (1.0, -1.0), (f64::INFINITY, 1.0), (1.0, f64::NAN)] {
            assert_eq!(
                check(params(17).set_weights(pass, stop)),
                Err(InvalidSpecification::NonPositiveWeight)
            );
        }
    }

    #[test]
    fn invalid_grid_interval() {
        for interval in [0.0, -1e-3, 0.6, f64::NAN] {
            assert_eq!(
                check(params(17).set_grid_interval(interval).set_tolerance(1e-4)),
                Err(InvalidSpecification::InvalidGridInterval)
            );
        }
    }

    #[test]
    fn invalid_loop_settings() {
        assert_eq!(
            check(params(17).set_tolerance(0.0)),
            Err(InvalidSpecification::NonPositiveTolerance)
        );
        assert_eq!(
            check(params(17).set_max_iterations(0)),
            Err(InvalidSpecification::ZeroIterations)
        );
    }
}
