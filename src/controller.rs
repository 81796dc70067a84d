use num_traits::Float;

// Maximum error bookkeeping carried from one exchange iteration to the next.
//
// The state is moved into `record` and handed back inside an
// `ExchangeState`, so that the loop owns a single value per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress<T> {
    previous_max_error: T,
    max_error: T,
    history: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeState<T> {
    Iterating(Progress<T>),
    Converged(Progress<T>),
}

impl<T: Float> Progress<T> {
    // The first convergence test compares against 200, so it only passes
    // if the first maximum error lies within the tolerance below it.
    pub fn new() -> Progress<T> {
        Progress {
            previous_max_error: T::zero(),
            max_error: T::from(200.0).unwrap(),
            history: Vec::new(),
        }
    }

    // Records the maximum weighted error of a new iteration. The algorithm
    // has converged if the error decreased by an amount in [0, tolerance].
    pub fn record(mut self, max_error: T, tolerance: T) -> ExchangeState<T> {
        self.previous_max_error = self.max_error;
        self.max_error = max_error;
        self.history.push(max_error);
        let decrease = self.previous_max_error - self.max_error;
        if decrease >= T::zero() && decrease <= tolerance {
            ExchangeState::Converged(self)
        } else {
            ExchangeState::Iterating(self)
        }
    }

    pub fn num_iterations(&self) -> usize {
        self.history.len()
    }

    pub fn max_error(&self) -> T {
        self.max_error
    }

    pub fn into_history(self) -> Vec<T> {
        self.history
    }
}

impl<T: Float> Default for Progress<T> {
    fn default() -> Progress<T> {
        Progress::new()
    }
}

// Coefficients of the iteration with the smallest maximum error, reported
// when the algorithm does not converge.
#[derive(Debug, Clone, PartialEq)]
pub struct BestIteration<T> {
    pub max_error: T,
    pub coefficients: Vec<T>,
}

impl<T: Float> BestIteration<T> {
    pub fn update(best: &mut Option<BestIteration<T>>, max_error: T, coefficients: &[T]) {
        if best.as_ref().is_none_or(|b| max_error < b.max_error) {
            *best = Some(BestIteration {
                max_error,
                coefficients: coefficients.to_vec(),
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn unwrap_iterating(state: ExchangeState<f64>) -> Progress<f64> {
        match state {
            ExchangeState::Iterating(progress) => progress,
            ExchangeState::Converged(p) => panic!("unexpected convergence: {p:?}"),
        }
    }

    #[test]
    fn first_iteration_keeps_iterating() {
        let progress = Progress::new();
        let progress = unwrap_iterating(progress.record(0.5, 1e-4));
        assert_eq!(progress.num_iterations(), 1);
        assert_eq!(progress.max_error(), 0.5);
    }

    #[test]
    fn first_iteration_close_to_initial_value_converges() {
        assert!(matches!(
            Progress::new().record(199.99995, 1e-4),
            ExchangeState::Converged(_)
        ));
        assert!(matches!(
            Progress::new().record(200.5, 1e-4),
            ExchangeState::Iterating(_)
        ));
    }

    #[test]
    fn small_decrease_converges() {
        let progress = unwrap_iterating(Progress::new().record(0.5, 1e-4));
        let progress = unwrap_iterating(progress.record(0.1, 1e-4));
        match progress.record(0.09995, 1e-4) {
            ExchangeState::Converged(progress) => {
                assert_eq!(progress.into_history(), vec![0.5, 0.1, 0.09995]);
            }
            ExchangeState::Iterating(p) => panic!("expected convergence: {p:?}"),
        }
    }

    #[test]
    fn unchanged_error_converges() {
        let progress = unwrap_iterating(Progress::new().record(0.1, 1e-4));
        assert!(matches!(
            progress.record(0.1, 1e-4),
            ExchangeState::Converged(_)
        ));
    }

    #[test]
    fn increasing_error_keeps_iterating() {
        let progress = unwrap_iterating(Progress::new().record(0.1, 1e-4));
        let progress = unwrap_iterating(progress.record(0.2, 1e-4));
        assert_eq!(progress.num_iterations(), 2);
    }

    #[test]
    fn best_iteration() {
        let mut best = None;
        BestIteration::update(&mut best, 0.3, &[1.0]);
        BestIteration::update(&mut best, 0.1, &[2.0]);
        BestIteration::update(&mut best, 0.2, &[3.0]);
        BestIteration::update(&mut best, 0.1, &[4.0]);
        assert_eq!(
            best,
            Some(BestIteration {
                max_error: 0.1,
                coefficients: vec![2.0]
            })
        );
    }
}
