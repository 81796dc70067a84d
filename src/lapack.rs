use ndarray::{Array, Dimension};

/// Scalar types that can be solved with the [`LapackBackend`](crate::LapackBackend).
///
/// LAPACK only handles `f32` and `f64`. Other scalars are converted to their
/// associated `Lapack` type before the solve and converted back afterwards.
pub trait ToLapack: Sized + 'static {
    /// Scalar type passed to LAPACK.
    type Lapack: ndarray_linalg::Lapack + ndarray_linalg::Scalar;

    /// Converts to the LAPACK scalar.
    fn to_lapack(&self) -> Self::Lapack;

    /// Converts back from the LAPACK scalar.
    fn from_lapack(lapack: &Self::Lapack) -> Self;

    /// Converts the interpolation matrix or right-hand side element-wise.
    fn array_to_lapack<D: Dimension>(array: Array<Self, D>) -> Array<Self::Lapack, D> {
        array.map(|s| s.to_lapack())
    }
}

/// Scalars solved by LAPACK without conversion.
pub trait IsLapack: ndarray_linalg::Lapack + ndarray_linalg::Scalar {}
impl IsLapack for f64 {}
impl IsLapack for f32 {}

impl<T: IsLapack> ToLapack for T {
    type Lapack = Self;

    fn to_lapack(&self) -> Self {
        *self
    }

    fn from_lapack(lapack: &Self) -> Self {
        *lapack
    }

    // no copy needed
    fn array_to_lapack<D: Dimension>(array: Array<Self, D>) -> Array<Self, D> {
        array
    }
}

// BigFloat systems are solved in f64 precision.
#[cfg(feature = "num-bigfloat")]
impl ToLapack for num_bigfloat::BigFloat {
    type Lapack = f64;

    fn to_lapack(&self) -> f64 {
        self.to_f64()
    }

    fn from_lapack(lapack: &f64) -> Self {
        Self::from_f64(*lapack)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn native_scalars_pass_through() {
        let a = array![[1.5_f64, -2.0], [0.25, 4.0]];
        assert_eq!(f64::array_to_lapack(a.clone()), a);
        assert_eq!(f32::from_lapack(&0.5f32.to_lapack()), 0.5);
    }
}
