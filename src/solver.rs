use crate::error::Error;
use ndarray::{Array1, Array2};

/// Linear solver backend.
///
/// This trait models a backend that solves square linear systems `A x = b`
/// with real scalars of type `T`. It is used to solve the interpolation system
/// of each exchange iteration.
///
/// `minimax-fir` includes support for several Rust linear algebra libraries
/// through types that implement this trait. These libraries are optional and
/// selected with feature flags. At the moment the following backends are
/// supported:
///
/// - `lapack-backend` feature flag. This defines the `LapackBackend` backend,
///   which uses `ndarray_linalg` to solve systems with LAPACK.
///
/// - `faer-backend` feature flag. This defines the `FaerBackend` backend,
///   which uses `faer` to solve systems.
///
/// - `nalgebra-backend` feature flag. This defines the `NalgebraBackend`,
///   which uses `nalgebra` to solve systems.
pub trait LinearSolverBackend<T> {
    /// Solves `matrix * x = rhs` and returns `x`.
    ///
    /// An error is returned if the backend detects that the matrix is
    /// singular. Backends are not required to detect ill-conditioning; the
    /// caller checks the returned solution.
    ///
    /// # Panics
    ///
    /// This function is allowed to panic if `matrix` is not a square matrix or
    /// if its size does not match the length of `rhs`.
    fn solve(&self, matrix: Array2<T>, rhs: Array1<T>) -> Result<Vec<T>>;
}

type Result<T> = std::result::Result<T, SolveError>;

/// Linear solver error.
///
/// This struct represents an error obtained by a linear solver backend. The
/// error contains a descriptive string of the problem.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SolveError(pub String);

impl From<SolveError> for Error {
    fn from(value: SolveError) -> Error {
        Error::SingularSystem(value.0)
    }
}

#[cfg(any(
    feature = "lapack-backend",
    feature = "faer-backend",
    feature = "nalgebra-backend"
))]
macro_rules! default_solver_doc {
    () => {
        r#" Default linear solver backend.

 This defines the default linear solver backend, which depends on what
 feature flags are enabled. The selected default backend is the first
 available from this priority list:

 - `lapack-backend`
 - `faer-backend`
 - `nalgebra-backend`
"#
    };
}

#[doc = default_solver_doc!()]
#[cfg(feature = "lapack-backend")]
pub type DefaultLinearSolver = LapackBackend;

#[doc = default_solver_doc!()]
#[cfg(all(not(feature = "lapack-backend"), feature = "faer-backend"))]
pub type DefaultLinearSolver = FaerBackend;

#[doc = default_solver_doc!()]
#[cfg(all(
    not(any(feature = "lapack-backend", feature = "faer-backend")),
    feature = "nalgebra-backend"
))]
pub type DefaultLinearSolver = NalgebraBackend;

#[cfg(feature = "lapack-backend")]
pub use lapack::LapackBackend;

#[cfg(feature = "lapack-backend")]
mod lapack {
    use super::*;
    use crate::lapack::ToLapack;
    use ndarray_linalg::{Solve, error::LinalgError};

    /// LAPACK linear solver backend.
    ///
    /// This is a linear solver backend that uses [`ndarray_linalg`] to solve
    /// systems with LAPACK LU factorization. For types natively supported by
    /// LAPACK, which are `f64` and `f32`, the calculations are done directly
    /// using that type. For other types, the [`ToLapack`] trait is used to
    /// convert the type `T` into a type (generally `f64`) that can be handled
    /// by LAPACK.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct LapackBackend {}

    impl<T: ToLapack> LinearSolverBackend<T> for LapackBackend {
        fn solve(&self, matrix: Array2<T>, rhs: Array1<T>) -> Result<Vec<T>> {
            let matrix = T::array_to_lapack(matrix);
            let rhs = T::array_to_lapack(rhs);
            let x = matrix.solve_into(rhs)?;
            Ok(x.iter().map(T::from_lapack).collect())
        }
    }

    impl From<LinalgError> for SolveError {
        fn from(value: LinalgError) -> SolveError {
            SolveError(value.to_string())
        }
    }
}

#[cfg(feature = "faer-backend")]
pub use faer::FaerBackend;

#[cfg(feature = "faer-backend")]
mod faer {
    use super::*;
    use ::faer::{linalg::solvers::Solve, traits::RealField};
    use faer_ext::IntoFaer;
    use ndarray::Axis;

    // This is needed because num_bigfloat can be a broken link if the crate is
    // not being built due to selected feature flags.
    #[allow(rustdoc::broken_intra_doc_links)]
    /// faer linear solver backend.
    ///
    /// This is a linear solver backend that uses [`faer`](::faer) LU
    /// factorization with partial pivoting. For types natively supported by
    /// `faer`, the calculations are done using that type. With
    /// [`num_bigfloat::BigFloat`] the type is converted first to `f64`.
    ///
    /// Partial pivoting LU does not report singular matrices. A singular
    /// system shows up as non-finite values in the solution, which are
    /// rejected by the caller.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct FaerBackend {}

    /// Marker trait used to mark for which types `T` that have the trait
    /// [`RealField`](RealField), the trait `LinearSolverBackend<T>` should be
    /// implemented for `FaerBackend` by doing no scalar type conversion and
    /// using the type `T` natively in [`faer`].
    ///
    /// A blanket implementation over `RealField` would prevent specialized
    /// implementations for types that do not implement it, because the
    /// upstream crate could add an implementation at any point.
    pub trait IsRealField: RealField + Copy {}
    impl IsRealField for f64 {}
    impl IsRealField for f32 {}

    fn solve_native<T: IsRealField>(matrix: Array2<T>, rhs: Array1<T>) -> Vec<T> {
        let n = rhs.len();
        let lu = matrix.view().into_faer().partial_piv_lu();
        let rhs = rhs.view().insert_axis(Axis(1));
        let x = lu.solve(rhs.into_faer());
        (0..n).map(|j| x[(j, 0)]).collect()
    }

    impl<T: IsRealField> LinearSolverBackend<T> for FaerBackend {
        fn solve(&self, matrix: Array2<T>, rhs: Array1<T>) -> Result<Vec<T>> {
            Ok(solve_native(matrix, rhs))
        }
    }

    // Stop-gap to use num-bigfloat with faer, by converting back and forth to
    // f64.
    #[cfg(feature = "num-bigfloat")]
    impl LinearSolverBackend<num_bigfloat::BigFloat> for FaerBackend {
        fn solve(
            &self,
            matrix: Array2<num_bigfloat::BigFloat>,
            rhs: Array1<num_bigfloat::BigFloat>,
        ) -> Result<Vec<num_bigfloat::BigFloat>> {
            let matrix = matrix.map(|x| x.to_f64());
            let rhs = rhs.map(|x| x.to_f64());
            Ok(solve_native(matrix, rhs)
                .into_iter()
                .map(num_bigfloat::BigFloat::from)
                .collect())
        }
    }
}

#[cfg(feature = "nalgebra-backend")]
pub use nalgebra::NalgebraBackend;

#[cfg(feature = "nalgebra-backend")]
mod nalgebra {
    use super::*;
    use ::nalgebra::{DMatrix, DVector, RealField};

    /// nalgebra linear solver backend.
    ///
    /// This is a linear solver backend that uses [`nalgebra`](::nalgebra) LU
    /// factorization. For types natively supported by `nalgebra`, which are
    /// only `f32` and `f64`, the calculations are done using that type. With
    /// [`num_bigfloat::BigFloat`] the type is converted first to `f64`.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct NalgebraBackend {}

    /// Marker trait used to mark for which types `T` that have the trait
    /// [`RealField`](RealField), the trait `LinearSolverBackend<T>` should be
    /// implemented for `NalgebraBackend` by doing no scalar type conversion
    /// and using the type `T` natively in [`nalgebra`].
    ///
    /// A blanket implementation over `RealField` would prevent specialized
    /// implementations for types that do not implement it, because the
    /// upstream crate could add an implementation at any point.
    pub trait IsRealField: RealField + Copy {}
    impl IsRealField for f64 {}
    impl IsRealField for f32 {}

    fn solve_native<T: IsRealField>(matrix: Array2<T>, rhs: Array1<T>) -> Result<Vec<T>> {
        let matrix = DMatrix::from_row_iterator(matrix.nrows(), matrix.ncols(), matrix);
        let rhs = DVector::from_iterator(rhs.len(), rhs);
        let x = matrix
            .lu()
            .solve(&rhs)
            .ok_or_else(|| SolveError("LU factorization is singular".to_string()))?;
        Ok(x.iter().copied().collect())
    }

    impl<T: IsRealField> LinearSolverBackend<T> for NalgebraBackend {
        fn solve(&self, matrix: Array2<T>, rhs: Array1<T>) -> Result<Vec<T>> {
            solve_native(matrix, rhs)
        }
    }

    #[cfg(feature = "num-bigfloat")]
    impl LinearSolverBackend<num_bigfloat::BigFloat> for NalgebraBackend {
        fn solve(
            &self,
            matrix: Array2<num_bigfloat::BigFloat>,
            rhs: Array1<num_bigfloat::BigFloat>,
        ) -> Result<Vec<num_bigfloat::BigFloat>> {
            let matrix = matrix.map(|x| x.to_f64());
            let rhs = rhs.map(|x| x.to_f64());
            Ok(solve_native(matrix, rhs)?
                .into_iter()
                .map(num_bigfloat::BigFloat::from_f64)
                .collect())
        }
    }
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
    use ndarray::array;

    #[test]
    fn solve_small_system() {
        let matrix = array![[2.0_f64, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]];
        let rhs = array![8.0, -11.0, -3.0];
        let x = DefaultLinearSolver::default().solve(matrix, rhs).unwrap();
        for (a, b) in x.iter().zip([2.0, 3.0, -1.0]) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
