use crate::error::{Error, Result};
use crate::grid::FrequencyGrid;
use crate::response::WeightedError;
use num_traits::{Float, FloatConst};

// Grid indices of the local extrema of the weighted error, in increasing
// order.
//
// A point is a maximum if it is strictly greater than its neighbours and
// positive, and a minimum if it is strictly less than its neighbours and
// negative. The grid boundaries only have one neighbour.
pub fn local_extrema<T: Float>(error: &[T]) -> Vec<usize> {
    assert!(error.len() >= 2);
    let zero = T::zero();
    let last = error.len() - 1;
    (0..=last)
        .filter(|&i| {
            let e = error[i];
            let greater = |j: usize| e > error[j];
            let less = |j: usize| e < error[j];
            let (is_max, is_min) = match i {
                0 => (greater(1), less(1)),
                i if i == last => (greater(last - 1), less(last - 1)),
                i => (
                    greater(i - 1) && greater(i + 1),
                    less(i - 1) && less(i + 1),
                ),
            };
            (is_max && e > zero) || (is_min && e < zero)
        })
        .collect()
}

// Finds the new extremal set of `size` points from the weighted error.
pub fn exchange<T: Float + FloatConst>(
    grid: &FrequencyGrid<T>,
    error: &WeightedError<T>,
    size: usize,
) -> Result<Vec<usize>> {
    let mut candidates = local_extrema(&error.values);
    if candidates.len() < size {
        return Err(Error::ExtremalSetUndersized {
            found: candidates.len(),
            required: size,
        });
    }
    prune_boundary_extrema(&mut candidates, error, grid.sentinels(), size)?;
    log::trace!("new extremal set {candidates:?}");
    Ok(candidates)
}

// Removes excess extrema until `size` remain. Only the sentinel points (the
// grid boundaries and the transition band edges) are considered for removal.
// Each step removes the sentinel with the smallest absolute error; on ties the
// earliest sentinel in the list wins.
fn prune_boundary_extrema<T: Float>(
    candidates: &mut Vec<usize>,
    error: &WeightedError<T>,
    sentinels: [usize; 4],
    size: usize,
) -> Result<()> {
    while candidates.len() > size {
        let mut smallest: Option<(usize, T)> = None;
        for sentinel in sentinels {
            if candidates.binary_search(&sentinel).is_err() {
                continue;
            }
            let e = error.abs(sentinel);
            if smallest.is_none_or(|(_, min)| e < min) {
                smallest = Some((sentinel, e));
            }
        }
        let Some((sentinel, _)) = smallest else {
            return Err(Error::ExtremalSetUnprunable {
                found: candidates.len(),
                required: size,
            });
        };
        log::trace!("discarding boundary extremum at grid index {sentinel}");
        if let Ok(position) = candidates.binary_search(&sentinel) {
            candidates.remove(position);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn error_of(values: Vec<f64>) -> WeightedError<f64> {
        let max_abs = values.iter().fold(0.0, |acc: f64, e| acc.max(e.abs()));
        WeightedError { values, max_abs }
    }

    #[test]
    fn interior_extrema_need_matching_sign() {
        let e = [0.0, 0.5, 0.2, -0.3, 0.1, -0.1, -0.4, -0.2, 0.3, 0.2];
        // the last sample is below its neighbour but positive
        assert_eq!(local_extrema(&e), vec![1, 3, 4, 6, 8]);
        // a local maximum below zero is not an extremum
        assert_eq!(local_extrema(&[-0.5, -0.1, -0.5]), vec![0, 2]);
        assert_eq!(local_extrema(&[0.5, 0.1, 0.5]), vec![0, 2]);
    }

    #[test]
    fn boundary_extrema() {
        assert_eq!(local_extrema(&[0.3, 0.1, 0.0, -0.2]), vec![0, 3]);
        assert_eq!(local_extrema(&[-0.3, 0.1, 0.05]), vec![0, 1]);
        // boundary points need the matching sign as well
        assert_eq!(local_extrema(&[-0.1, -0.3, 0.0]), vec![1]);
        // flat error has no extrema
        assert_eq!(local_extrema(&[0.0; 5]), Vec::<usize>::new());
    }

    #[test]
    fn prune_smallest_sentinel() {
        // sentinels at 0, 3, 5 and 9
        let error = error_of(vec![
            0.2, -0.5, 0.6, 0.9, 0.0, -0.1, 0.3, -0.4, 0.5, -0.05,
        ]);
        let mut candidates = vec![0, 1, 3, 5, 7, 8, 9];
        prune_boundary_extrema(&mut candidates, &error, [0, 3, 5, 9], 5).unwrap();
        // 9 (0.05) goes first, then 5 (0.1)
        assert_eq!(candidates, vec![0, 1, 3, 7, 8]);
    }

    #[test]
    fn prune_tie_prefers_earliest_sentinel() {
        let error = error_of(vec![0.1, -0.5, 0.1, -0.5, 0.1]);
        let mut candidates = vec![0, 1, 2, 3, 4];
        prune_boundary_extrema(&mut candidates, &error, [0, 2, 2, 4], 4).unwrap();
        assert_eq!(candidates, vec![1, 2, 3, 4]);
    }

    #[test]
    fn exchange_undersized() {
        let band_spec = crate::types::BandSpec::lowpass(0.2, 0.3).unwrap();
        let grid = FrequencyGrid::new(&band_spec, 1.0, 1.0, 10);
        // a single sign change gives the two boundary extrema only
        let values = (0..=10).map(|i| 0.5 - 0.1 * i as f64).collect();
        let result = exchange(&grid, &error_of(values), 4);
        assert!(matches!(
            result,
            Err(Error::ExtremalSetUndersized {
                found: 2,
                required: 4
            })
        ));
    }

    #[test]
    fn prune_only_considers_sentinels() {
        let error = error_of(vec![0.0, 0.5, -0.01, 0.5, -0.5, 0.0]);
        let mut candidates = vec![1, 2, 3, 4];
        let result = prune_boundary_extrema(&mut candidates, &error, [0, 0, 5, 5], 3);
        assert!(matches!(
            result,
            Err(Error::ExtremalSetUnprunable {
                found: 4,
                required: 3
            })
        ));
    }
}
