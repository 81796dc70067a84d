use num_traits::Float;

// Impulse response of the odd length, even symmetric FIR filter whose
// zero-phase response is R(f) = s[0] + sum_{1 <= i <= k} s[i] cos(2*pi*i*f).
//
// The center tap is s[0] and the taps at distance i from the center are
// s[i] / 2.
pub fn impulse_response<T: Float>(coefficients: &[T], length: usize) -> Vec<T> {
    debug_assert_eq!(2 * coefficients.len() - 1, length);
    let mut h = Vec::with_capacity(length);
    let scale = T::from(0.5).unwrap();
    h.extend(coefficients[1..].iter().rev().map(|&s| s * scale));
    h.push(coefficients[0]);
    h.extend(coefficients[1..].iter().map(|&s| s * scale));
    h
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chebyshev::evaluate_cosine_series;

    #[test]
    fn symmetric_taps() {
        let h = impulse_response(&[0.5, 0.25, -0.125], 5);
        assert_eq!(h, vec![-0.0625, 0.125, 0.5, 0.125, -0.0625]);
    }

    #[test]
    fn taps_match_cosine_series() {
        let s = [0.4, 0.3, -0.1, 0.05];
        let h = impulse_response(&s, 7);
        let center = 3;
        for f in [0.0, 0.1, 0.23, 0.5] {
            // zero-phase DTFT of the taps around the center tap
            let dtft: f64 = h
                .iter()
                .enumerate()
                .map(|(n, &hn)| {
                    let m = n as f64 - center as f64;
                    hn * (std::f64::consts::TAU * f * m).cos()
                })
                .sum();
            assert!((dtft - evaluate_cosine_series(&s, f)).abs() < 1e-12);
        }
    }
}
