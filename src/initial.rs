use crate::error::{Error, Result};
use crate::grid::FrequencyGrid;
use crate::types::Initialization;
use itertools::Itertools;
use num_traits::{Float, FloatConst};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Initial guess for the extremal set, as sorted grid indices.
//
// The caller guarantees that the grid has at least `size` admissible points.
pub fn initial_extremal_set<T: Float + FloatConst>(
    grid: &FrequencyGrid<T>,
    size: usize,
    initialization: Initialization,
    seed: u64,
    max_redraws: usize,
) -> Result<Vec<usize>> {
    let set = match initialization {
        Initialization::Random => random_extremal_set(grid, size, seed, max_redraws)?,
        Initialization::Uniform => uniform_extremal_set(grid, size),
    };
    debug_assert_eq!(set.len(), size);
    debug_assert!(set.iter().tuple_windows().all(|(a, b)| a < b));
    debug_assert!(set.iter().all(|&i| !grid.is_transition(i)));
    Ok(set)
}

// Pseudorandom draws over the whole grid. The first candidate is replaced by
// the passband midpoint. Candidates that fall strictly inside the transition
// band, or that repeat an accepted point, are redrawn.
fn random_extremal_set<T: Float + FloatConst>(
    grid: &FrequencyGrid<T>,
    size: usize,
    seed: u64,
    max_redraws: usize,
) -> Result<Vec<usize>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let last = grid.num_intervals();
    let mut candidates: Vec<usize> = (0..size).map(|_| rng.random_range(0..=last)).collect();
    candidates[0] = grid.passband_midpoint();

    let mut taken = vec![false; grid.len()];
    let mut accepted = Vec::with_capacity(size);
    for candidate in candidates {
        let mut index = candidate;
        let mut redraws = 0;
        while grid.is_transition(index) || taken[index] {
            if redraws == max_redraws {
                return Err(Error::InitializationExhausted {
                    attempts: max_redraws,
                });
            }
            index = rng.random_range(0..=last);
            redraws += 1;
        }
        taken[index] = true;
        accepted.push(index);
    }
    Ok(accepted.into_iter().sorted_unstable().collect())
}

// Evenly spaced points over the admissible grid points.
fn uniform_extremal_set<T: Float + FloatConst>(grid: &FrequencyGrid<T>, size: usize) -> Vec<usize> {
    let admissible: Vec<usize> = (0..grid.len()).filter(|&i| !grid.is_transition(i)).collect();
    let span = admissible.len() - 1;
    let steps = size - 1;
    (0..size)
        .map(|j| admissible[(j * span + steps / 2) / steps])
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::BandSpec;

    fn grid(passband_end: f64, stopband_begin: f64, num_intervals: usize) -> FrequencyGrid<f64> {
        let band_spec = BandSpec::lowpass(passband_end, stopband_begin).unwrap();
        FrequencyGrid::new(&band_spec, 1.0, 1.0, num_intervals)
    }

    fn check_set(grid: &FrequencyGrid<f64>, set: &[usize], size: usize) {
        assert_eq!(set.len(), size);
        assert!(set.iter().tuple_windows().all(|(a, b)| a < b));
        assert!(set.iter().all(|&i| !grid.is_transition(i)));
    }

    #[test]
    fn random_set_is_admissible() {
        let grid = grid(0.2, 0.3, 10_000);
        for seed in 0..20 {
            let set = initial_extremal_set(&grid, 10, Initialization::Random, seed, 10_000).unwrap();
            check_set(&grid, &set, 10);
            assert!(set.contains(&grid.passband_midpoint()));
        }
    }

    #[test]
    fn random_set_is_reproducible() {
        let grid = grid(0.2, 0.3, 10_000);
        let a = initial_extremal_set(&grid, 18, Initialization::Random, 1234, 10_000).unwrap();
        let b = initial_extremal_set(&grid, 18, Initialization::Random, 1234, 10_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_set_on_small_grid() {
        // ten admissible points, the only transition point is 0.25
        let grid = grid(0.2, 0.3, 10);
        assert_eq!(grid.admissible_count(), 10);
        let set = initial_extremal_set(&grid, 10, Initialization::Random, 7, 100_000).unwrap();
        check_set(&grid, &set, 10);
        assert_eq!(set, vec![0, 1, 2, 3, 4, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn redraws_exhausted() {
        let grid = grid(0.01, 0.49, 1000);
        let result = initial_extremal_set(&grid, 10, Initialization::Random, 3, 0);
        assert!(matches!(
            result,
            Err(Error::InitializationExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn uniform_set() {
        let grid = grid(0.2, 0.3, 10_000);
        let set = initial_extremal_set(&grid, 10, Initialization::Uniform, 0, 0).unwrap();
        check_set(&grid, &set, 10);
        assert_eq!(set[0], 0);
        assert_eq!(*set.last().unwrap(), 10_000);
    }
}
