use crate::error::{Error, Result};
use crate::grid::FrequencyGrid;
use crate::solver::LinearSolverBackend;
use ndarray::{Array1, Array2};
use num_traits::{Float, FloatConst};

// Solution of the interpolation system for one extremal set.
#[derive(Debug, Clone, PartialEq)]
pub struct CosineModel<T> {
    // s[0..=k] of R(f) = s[0] + sum_i s[i] cos(2*pi*i*f)
    pub coefficients: Vec<T>,
    // Signed equiripple error term. The weighted error at the j-th extremal
    // frequency is -(-1)^j * ripple.
    pub ripple: T,
}

// Builds the (k + 2) x (k + 2) interpolation system
//
// s[0] + sum_{1 <= i <= k} s[i] cos(2*pi*i*x_j) + (-1)^j delta / W(x_j) = D(x_j)
//
// for the extremal frequencies x_j, given as grid indices.
pub fn interpolation_system<T: Float + FloatConst>(
    grid: &FrequencyGrid<T>,
    extremal: &[usize],
) -> (Array2<T>, Array1<T>) {
    let n = extremal.len();
    let k = n - 2;
    let one = T::one();
    let matrix = Array2::from_shape_fn((n, n), |(j, i)| {
        let index = extremal[j];
        if i == 0 {
            one
        } else if i <= k {
            (T::TAU() * T::from(i).unwrap() * grid.freq(index)).cos()
        } else {
            let w = grid.weight(index).recip();
            if j % 2 == 0 { w } else { -w }
        }
    });
    let rhs = extremal.iter().map(|&index| grid.desired(index)).collect();
    (matrix, rhs)
}

// Solves the interpolation system for the given extremal set.
pub fn solve_interpolation<T, B>(
    grid: &FrequencyGrid<T>,
    extremal: &[usize],
    backend: &B,
) -> Result<CosineModel<T>>
where
    T: Float + FloatConst,
    B: LinearSolverBackend<T>,
{
    let (matrix, rhs) = interpolation_system(grid, extremal);
    let n = rhs.len();
    let mut solution = solve_checked(matrix, rhs, backend)?;
    let ripple = solution[n - 1];
    solution.truncate(n - 1);
    Ok(CosineModel {
        coefficients: solution,
        ripple,
    })
}

// Solves matrix * x = rhs with the backend, rejecting solutions that are not
// finite or that do not satisfy the system.
fn solve_checked<T, B>(matrix: Array2<T>, rhs: Array1<T>, backend: &B) -> Result<Vec<T>>
where
    T: Float,
    B: LinearSolverBackend<T>,
{
    let n = rhs.len();
    let solution = backend.solve(matrix.clone(), rhs.clone())?;
    if solution.len() != n {
        return Err(Error::SingularSystem(format!(
            "solver returned {} values for a system of size {}",
            solution.len(),
            n
        )));
    }
    if solution.iter().any(|x| !x.is_finite()) {
        return Err(Error::SingularSystem(
            "solution contains non-finite values".to_string(),
        ));
    }

    // A backward stable solver has a residual close to machine precision,
    // even for badly conditioned systems. A large residual indicates that
    // the factorization broke down.
    let zero = T::zero();
    let residual = matrix
        .rows()
        .into_iter()
        .zip(rhs.iter())
        .map(|(row, &b)| {
            let ax = row
                .iter()
                .zip(solution.iter())
                .fold(zero, |acc, (&a, &x)| acc + a * x);
            (ax - b).abs()
        })
        .fold(zero, T::max);
    let scale = rhs.iter().fold(T::one(), |acc, &b| acc.max(T::one() + b.abs()));
    if residual > T::epsilon().sqrt() * scale {
        return Err(Error::SingularSystem(format!(
            "residual {} exceeds tolerance",
            residual.to_f64().unwrap_or(f64::NAN)
        )));
    }

    Ok(solution)
}

// Solves the interpolation system, retrying once with a perturbed extremal
// set if the first system is singular. On a successful retry the extremal set
// is replaced by the perturbed one.
pub fn solve_interpolation_with_retry<T, B>(
    grid: &FrequencyGrid<T>,
    extremal: &mut Vec<usize>,
    backend: &B,
    retry: bool,
) -> Result<CosineModel<T>>
where
    T: Float + FloatConst,
    B: LinearSolverBackend<T>,
{
    match solve_interpolation(grid, extremal, backend) {
        Err(Error::SingularSystem(reason)) if retry => {
            log::warn!(
                "singular interpolation system ({reason}), retrying with a perturbed extremal set"
            );
            let perturbed = perturb_extremal_set(grid, extremal);
            let model = solve_interpolation(grid, &perturbed, backend)?;
            *extremal = perturbed;
            Ok(model)
        }
        result => result,
    }
}

// Moves every extremal point in an odd position one grid step up, or one
// step down when moving up is not possible. A point is only moved if it stays
// on the grid, outside the transition band, and strictly between its
// neighbours.
pub fn perturb_extremal_set<T: Float + FloatConst>(
    grid: &FrequencyGrid<T>,
    extremal: &[usize],
) -> Vec<usize> {
    let mut perturbed = extremal.to_vec();
    let last = grid.num_intervals();
    for j in (1..perturbed.len()).step_by(2) {
        let prev = perturbed[j - 1];
        let next = perturbed.get(j + 1).copied();
        let up = perturbed[j] + 1;
        let down = perturbed[j].checked_sub(1);
        if up <= last && next.is_none_or(|next| up < next) && !grid.is_transition(up) {
            perturbed[j] = up;
        } else if let Some(down) = down
            && down > prev
            && !grid.is_transition(down)
        {
            perturbed[j] = down;
        }
    }
    perturbed
}

#[cfg(all(
    test,
    any(
        feature = "lapack-backend",
        feature = "faer-backend",
        feature = "nalgebra-backend"
    )
))]
mod test {
    use super::*;
    use crate::chebyshev::evaluate_cosine_series;
    use crate::solver::{DefaultLinearSolver, SolveError};
    use crate::types::BandSpec;
    use ndarray::array;
    use std::cell::Cell;

    fn grid() -> FrequencyGrid<f64> {
        let band_spec = BandSpec::lowpass(0.2, 0.3).unwrap();
        FrequencyGrid::new(&band_spec, 1.0, 0.6, 10_000)
    }

    #[test]
    fn system_layout() {
        let grid = grid();
        let extremal = [0, 2000, 4000, 6000, 10_000];
        let (matrix, rhs) = interpolation_system(&grid, &extremal);
        assert_eq!(matrix.dim(), (5, 5));
        assert!(matrix.column(0).iter().all(|&x| x == 1.0));
        assert!((matrix[(1, 1)] - (std::f64::consts::TAU * 0.1).cos()).abs() < 1e-15);
        assert!((matrix[(4, 3)] + 1.0).abs() < 1e-12);
        assert_eq!(matrix[(0, 4)], 1.0);
        assert_eq!(matrix[(1, 4)], -1.0);
        assert!((matrix[(3, 4)] + 1.0 / 0.6).abs() < 1e-15);
        assert_eq!(rhs.to_vec(), vec![1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn alternating_error_at_extremal_set() {
        let grid = grid();
        let extremal = vec![0, 1000, 2500, 4000, 6000, 7000, 8000, 9000, 9500, 10_000];
        let model = solve_interpolation(&grid, &extremal, &DefaultLinearSolver::default()).unwrap();
        assert_eq!(model.coefficients.len(), 9);
        for (j, &index) in extremal.iter().enumerate() {
            let f = grid.freq(index);
            let error = grid.weight(index)
                * (evaluate_cosine_series(&model.coefficients, f) - grid.desired(index));
            let expected = if j % 2 == 0 { -model.ripple } else { model.ripple };
            assert!((error - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn repeated_points_force_zero_ripple() {
        // The two rows of a repeated point only differ in the sign of the
        // ripple column, so the system is still regular
        let grid = grid();
        let extremal = vec![0, 1000, 1000, 6000, 10_000];
        let model = solve_interpolation(&grid, &extremal, &DefaultLinearSolver::default()).unwrap();
        assert!(model.ripple.abs() < 1e-12);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let matrix = array![[1.0_f64, 2.0], [1.0, 2.0]];
        let rhs = array![1.0, 2.0];
        let result = solve_checked(matrix, rhs, &DefaultLinearSolver::default());
        assert!(matches!(result, Err(Error::SingularSystem(_))));
    }

    #[test]
    fn inaccurate_solution_is_rejected() {
        struct WrongBackend;
        impl LinearSolverBackend<f64> for WrongBackend {
            fn solve(
                &self,
                _matrix: Array2<f64>,
                rhs: Array1<f64>,
            ) -> std::result::Result<Vec<f64>, SolveError> {
                Ok(vec![1.0; rhs.len()])
            }
        }
        let matrix = array![[2.0_f64, 0.0], [0.0, 2.0]];
        let rhs = array![2.0, 2.0];
        assert_eq!(
            solve_checked(matrix.clone(), rhs, &WrongBackend).unwrap(),
            vec![1.0, 1.0]
        );
        let result = solve_checked(matrix, array![2.0, 3.0], &WrongBackend);
        assert!(matches!(result, Err(Error::SingularSystem(_))));
    }

    struct FailingBackend;

    impl LinearSolverBackend<f64> for FailingBackend {
        fn solve(
            &self,
            _matrix: Array2<f64>,
            _rhs: Array1<f64>,
        ) -> std::result::Result<Vec<f64>, SolveError> {
            Err(SolveError("always singular".to_string()))
        }
    }

    #[test]
    fn retry_fails_twice() {
        let grid = grid();
        let mut extremal = vec![0, 1000, 2000, 6000, 10_000];
        let result = solve_interpolation_with_retry(&grid, &mut extremal, &FailingBackend, true);
        assert!(matches!(result, Err(Error::SingularSystem(_))));
        assert_eq!(extremal, vec![0, 1000, 2000, 6000, 10_000]);
    }

    // Fails on the first solve and uses the default backend afterwards.
    struct FailsOnceBackend {
        failed: Cell<bool>,
    }

    impl LinearSolverBackend<f64> for FailsOnceBackend {
        fn solve(
            &self,
            matrix: Array2<f64>,
            rhs: Array1<f64>,
        ) -> std::result::Result<Vec<f64>, SolveError> {
            if self.failed.replace(true) {
                DefaultLinearSolver::default().solve(matrix, rhs)
            } else {
                Err(SolveError("singular on first call".to_string()))
            }
        }
    }

    #[test]
    fn retry_replaces_extremal_set() {
        let grid = grid();
        let original = vec![0, 1000, 2500, 4000, 6000, 7000, 8000, 9000, 9500, 10_000];
        let mut extremal = original.clone();
        let backend = FailsOnceBackend {
            failed: Cell::new(false),
        };
        let model = solve_interpolation_with_retry(&grid, &mut extremal, &backend, true).unwrap();
        assert_eq!(
            extremal,
            vec![0, 1001, 2500, 3999, 6000, 7001, 8000, 9001, 9500, 9999]
        );
        assert_eq!(extremal, perturb_extremal_set(&grid, &original));
        let direct = solve_interpolation(&grid, &extremal, &DefaultLinearSolver::default()).unwrap();
        assert_eq!(model, direct);
    }

    #[test]
    fn retry_disabled() {
        let grid = grid();
        let mut extremal = vec![0, 1000, 2500, 4000, 6000, 7000, 8000, 9000, 9500, 10_000];
        let backend = FailsOnceBackend {
            failed: Cell::new(false),
        };
        let result = solve_interpolation_with_retry(&grid, &mut extremal, &backend, false);
        assert!(matches!(result, Err(Error::SingularSystem(_))));
        assert_eq!(extremal[1], 1000);
    }

    #[test]
    fn perturbation_keeps_set_valid() {
        let grid = grid();
        // 4001 is in the transition band and 10_001 is off the grid, so those
        // points move down instead
        let perturbed = perturb_extremal_set(&grid, &[0, 4000, 6000, 6001, 7000, 10_000]);
        assert_eq!(perturbed, vec![0, 3999, 6000, 6002, 7000, 9999]);
    }
}
