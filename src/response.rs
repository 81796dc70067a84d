use crate::chebyshev::clenshaw;
use crate::grid::FrequencyGrid;
use num_traits::{Float, FloatConst};

// Weighted error E(f) = W(f) * (R(f) - D(f)) over every grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedError<T> {
    pub values: Vec<T>,
    // max |E(f)| over the grid, used as the convergence metric
    pub max_abs: T,
}

impl<T: Float> WeightedError<T> {
    pub fn abs(&self, index: usize) -> T {
        self.values[index].abs()
    }
}

// Reconstructs R(f) = s[0] + sum_i s[i] cos(2*pi*i*f) on the grid and
// computes the weighted error.
pub fn weighted_error<T: Float + FloatConst>(
    grid: &FrequencyGrid<T>,
    coefficients: &[T],
) -> WeightedError<T> {
    let values: Vec<T> = (0..grid.len())
        .map(|i| {
            let r = clenshaw(coefficients, grid.cosine(i));
            grid.weight(i) * (r - grid.desired(i))
        })
        .collect();
    let max_abs = values.iter().fold(T::zero(), |acc, e| acc.max(e.abs()));
    WeightedError { values, max_abs }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::BandSpec;

    #[test]
    fn ideal_constant_response() {
        let band_spec = BandSpec::lowpass(0.2, 0.3).unwrap();
        let grid = FrequencyGrid::new(&band_spec, 1.0, 0.5, 1000);
        // R(f) = 1 everywhere: no error in the passband, weighted error of
        // 0.5 in the stopband, nothing in the transition band.
        let error = weighted_error(&grid, &[1.0, 0.0, 0.0]);
        assert_eq!(error.values.len(), 1001);
        assert_eq!(error.values[0], 0.0);
        assert_eq!(error.values[400], 0.0);
        assert_eq!(error.values[450], 0.0);
        assert_eq!(error.values[600], 0.5);
        assert_eq!(error.max_abs, 0.5);
    }

    #[test]
    fn cosine_response() {
        let band_spec = BandSpec::lowpass(0.2, 0.3).unwrap();
        let grid = FrequencyGrid::new(&band_spec, 2.0, 1.0, 1000);
        // R(f) = cos(2*pi*f) - 1 has its largest stopband magnitude at 0.5
        let error = weighted_error(&grid, &[-1.0, 1.0]);
        assert!((error.values[1000] + 2.0).abs() < 1e-12);
        // passband error is 2 * (R - 1), largest at the passband edge
        let edge = 2.0 * ((std::f64::consts::TAU * 0.2).cos() - 2.0);
        assert!((error.values[400] - edge).abs() < 1e-12);
        assert!((error.max_abs - edge.abs()).abs() < 1e-12);
        assert!((error.abs(1000) - 2.0).abs() < 1e-12);
    }
}
