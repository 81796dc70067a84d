use num_traits::{Float, FloatConst};

// Clenshaw's algorithm for Chebyshev polynomials of the first kind T_k.
// Evaluates \sum a_k T_k(x).
//
// Since T_k(cos(w)) = cos(k*w), this evaluates the cosine series
// \sum a_k cos(k*w) at x = cos(w) without computing any further cosines.
pub fn clenshaw<T: Float>(a: &[T], x: T) -> T {
    match a.len() {
        0 => return T::zero(),
        1 => return a[0],
        _ => {}
    }
    let mut b2 = T::zero();
    let mut b1 = a[a.len() - 1];
    let two_x = T::from(2).unwrap() * x;
    for &ak in a[1..a.len() - 1].iter().rev() {
        let tmp = two_x * b1 - b2 + ak;
        b2 = b1;
        b1 = tmp;
    }
    x * b1 - b2 + a[0]
}

// Evaluates R(f) = s[0] + \sum_{i >= 1} s[i] cos(2*pi*i*f) for f in
// cycles/sample.
pub fn evaluate_cosine_series<T: Float + FloatConst>(s: &[T], f: T) -> T {
    clenshaw(s, (T::TAU() * f).cos())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn matches_direct_sum() {
        let s = [0.5, -0.25, 0.125, 0.1, -0.05];
        for j in 0..=50 {
            let f = j as f64 / 100.0;
            let direct: f64 = s[0]
                + s.iter()
                    .enumerate()
                    .skip(1)
                    .map(|(i, &c)| c * (TAU * i as f64 * f).cos())
                    .sum::<f64>();
            assert!((evaluate_cosine_series(&s, f) - direct).abs() < 1e-14);
        }
    }

    #[test]
    fn short_series() {
        assert_eq!(clenshaw::<f64>(&[], 0.3), 0.0);
        assert_eq!(clenshaw(&[0.7], 0.3), 0.7);
        assert!((clenshaw(&[0.7, 2.0], 0.3) - 1.3).abs() < 1e-15);
    }
}
