use crate::chebyshev::evaluate_cosine_series;
use crate::error::{InvalidSpecification, Result};
use num_traits::{Float, FloatConst};

/// Band.
///
/// A band defines a closed subinterval of [0.0, 0.5] in normalized frequency
/// (cycles/sample).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Band<T> {
    begin: T,
    end: T,
}

impl<T: Float> Band<T> {
    /// Creates a new band.
    ///
    /// The band is the closed interval `[begin, end]`.
    pub fn new(begin: T, end: T) -> Result<Band<T>> {
        if !begin.is_finite() || !end.is_finite() {
            Err(InvalidSpecification::BandLimitsOutOfBounds)?
        }
        if begin > end {
            Err(InvalidSpecification::BandLimitsWrongOrder)?
        }
        if begin < T::zero() || end > T::from(0.5).unwrap() {
            Err(InvalidSpecification::BandLimitsOutOfBounds)?
        }
        Ok(Band { begin, end })
    }
}

impl<T: Copy> Band<T> {
    /// Returns the beginning of the band.
    pub fn begin(&self) -> T {
        self.begin
    }

    /// Returns the end of the band.
    pub fn end(&self) -> T {
        self.end
    }
}

impl<T: Float> Band<T> {
    /// Returns the length of the band.
    ///
    /// The length is defined as `end - begin`.
    pub fn len(&self) -> T {
        self.end - self.begin
    }

    /// Returns true if the band contains a certain element.
    pub fn contains(&self, element: T) -> bool {
        (self.begin()..=self.end()).contains(&element)
    }

    /// Returns true if the element lies strictly inside the band.
    pub fn contains_strictly(&self, element: T) -> bool {
        self.begin() < element && element < self.end()
    }

    /// Returns the midpoint of the band.
    pub fn midpoint(&self) -> T {
        (self.begin + self.end) * T::from(0.5).unwrap()
    }
}

/// Kind of filter described by a [`BandSpec`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FilterKind {
    /// The desired response is one below the transition band.
    Lowpass,
    /// The desired response is one above the transition band.
    Highpass,
}

/// Band specification.
///
/// A passband, a transition band adjacent to it, and an implicit stopband
/// covering the rest of [0.0, 0.5]. The transition band is a dead zone in
/// which the weighted error is not constrained. Whether the filter is a
/// lowpass or a highpass is derived from which end of the passband the
/// transition band touches.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BandSpec<T> {
    passband: Band<T>,
    transition: Band<T>,
    kind: FilterKind,
}

impl<T: Float> BandSpec<T> {
    /// Creates a new band specification.
    ///
    /// The transition band must begin exactly where the passband ends
    /// (lowpass) or end exactly where the passband begins (highpass). Neither
    /// band may be a single point. Since only one passband/stopband pair is
    /// supported, a lowpass passband must begin at 0.0 and a highpass passband
    /// must end at 0.5.
    pub fn new(passband: Band<T>, transition: Band<T>) -> Result<BandSpec<T>> {
        let zero = T::zero();
        if passband.len() == zero {
            Err(InvalidSpecification::DegeneratePassband)?
        }
        if transition.len() == zero {
            Err(InvalidSpecification::DegenerateTransition)?
        }
        let kind = if passband.end() == transition.begin() {
            if passband.begin() != zero {
                Err(InvalidSpecification::NotSingleBandPair)?
            }
            FilterKind::Lowpass
        } else if transition.end() == passband.begin() {
            if passband.end() != T::from(0.5).unwrap() {
                Err(InvalidSpecification::NotSingleBandPair)?
            }
            FilterKind::Highpass
        } else {
            Err(InvalidSpecification::NotAdjacent)?
        };
        Ok(BandSpec {
            passband,
            transition,
            kind,
        })
    }

    /// Creates a lowpass specification.
    ///
    /// The passband is `[0.0, passband_end]` and the transition band is
    /// `[passband_end, stopband_begin]`.
    pub fn lowpass(passband_end: T, stopband_begin: T) -> Result<BandSpec<T>> {
        BandSpec::new(
            Band::new(T::zero(), passband_end)?,
            Band::new(passband_end, stopband_begin)?,
        )
    }

    /// Creates a highpass specification.
    ///
    /// The transition band is `[stopband_end, passband_begin]` and the
    /// passband is `[passband_begin, 0.5]`.
    pub fn highpass(stopband_end: T, passband_begin: T) -> Result<BandSpec<T>> {
        BandSpec::new(
            Band::new(passband_begin, T::from(0.5).unwrap())?,
            Band::new(stopband_end, passband_begin)?,
        )
    }

    /// Returns the passband.
    pub fn passband(&self) -> Band<T> {
        self.passband
    }

    /// Returns the transition band.
    pub fn transition(&self) -> Band<T> {
        self.transition
    }

    /// Returns the kind of filter.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Returns the frequency at which the desired response steps between one
    /// and zero, which is the midpoint of the transition band.
    pub fn edge_freq(&self) -> T {
        self.transition.midpoint()
    }
}

/// How the initial extremal set is chosen.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Initialization {
    /// Pseudorandom draws over the whole grid from a generator seeded with
    /// [`DesignParameters::seed`], with one point forced to the passband
    /// midpoint and transition band points redrawn.
    #[default]
    Random,
    /// Points evenly spaced over the grid points that are outside the
    /// transition band. The seed is not used.
    Uniform,
}

/// A FIR filter design produced by the [`minimax_design`](crate::minimax_design)
/// function.
///
/// The type parameter `T` corresponds to the scalar type used in the
/// calculations. Typically it implements the [`Float`] trait.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxDesign<T> {
    /// Impulse response of the FIR filter.
    ///
    /// This is the list of taps of the filter. It is symmetric about its
    /// center tap.
    pub impulse_response: Vec<T>,
    /// Maximum absolute weighted error over the frequency grid in the last
    /// iteration.
    pub max_error: T,
    /// Absolute value of the equiripple error term solved jointly with the
    /// coefficients in the last iteration.
    pub ripple: T,
    /// Coefficients `s[0..=k]` of the cosine-series model
    /// `R(f) = s[0] + sum_i s[i] cos(2 pi i f)`.
    pub coefficients: Vec<T>,
    /// Extremal frequencies used in the last interpolation.
    ///
    /// The frequencies are grid frequencies in the interval [0.0, 0.5].
    pub extremal_freqs: Vec<T>,
    /// Number of iterations performed by the exchange algorithm.
    pub num_iterations: usize,
    /// Maximum absolute weighted error of each iteration.
    pub error_history: Vec<T>,
}

impl<T: Float + FloatConst> MinimaxDesign<T> {
    /// Evaluates the zero-phase frequency response `R(f)` of the design.
    ///
    /// The frequency `f` is normalized (cycles/sample). The magnitude of the
    /// frequency response of the impulse response equals `|R(f)|`.
    pub fn frequency_response(&self, f: T) -> T {
        evaluate_cosine_series(&self.coefficients, f)
    }
}

/// Minimax design parameters struct.
///
/// This struct holds the specification of the filter together with the
/// settings that control the exchange algorithm. The required values are
/// given to [`MinimaxParameters::new`] and the rest take default values that
/// can be changed through the [`ParametersBuilder`] trait.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxParameters<T> {
    length: usize,
    band_spec: BandSpec<T>,
    pass_weight: T,
    stop_weight: T,
    grid_interval: T,
    tolerance: Option<T>,
    initialization: Initialization,
    seed: u64,
    max_iterations: usize,
    max_redraws: usize,
    perturbation_retry: bool,
}

/// Minimax design parameters trait.
///
/// This trait defines the methods that
/// [`minimax_design`](crate::minimax_design) uses to obtain the filter
/// specification and the algorithm settings. It is implemented by
/// [`MinimaxParameters`]. The design function assumes that each of these
/// methods always returns the same value every time it is called during one
/// design run.
pub trait DesignParameters<T> {
    /// Returns the filter length (number of taps).
    fn length(&self) -> usize;

    /// Returns the band specification.
    fn band_spec(&self) -> &BandSpec<T>;

    /// Returns the weight of the passband.
    fn pass_weight(&self) -> T;

    /// Returns the weight of the stopband.
    fn stop_weight(&self) -> T;

    /// Returns the spacing of the analog frequency grid.
    ///
    /// The grid has `round(1 / grid_interval) + 1` points evenly spread over
    /// [0.0, 0.5].
    fn grid_interval(&self) -> T;

    /// Returns the convergence tolerance.
    ///
    /// The algorithm stops when the maximum weighted error decreases by an
    /// amount in `[0, tolerance]` from one iteration to the next.
    fn tolerance(&self) -> T;

    /// Returns how the initial extremal set is chosen.
    fn initialization(&self) -> Initialization;

    /// Returns the seed of the pseudorandom generator used by
    /// [`Initialization::Random`].
    fn seed(&self) -> u64;

    /// Returns the maximum number of exchange iterations.
    fn max_iterations(&self) -> usize;

    /// Returns how many times a single initial candidate may be redrawn
    /// before giving up.
    fn max_redraws(&self) -> usize;

    /// Returns whether a singular interpolation system is retried once with a
    /// perturbed extremal set.
    fn perturbation_retry(&self) -> bool;
}

impl<T: Float> DesignParameters<T> for MinimaxParameters<T> {
    fn length(&self) -> usize {
        self.length
    }
    fn band_spec(&self) -> &BandSpec<T> {
        &self.band_spec
    }
    fn pass_weight(&self) -> T {
        self.pass_weight
    }
    fn stop_weight(&self) -> T {
        self.stop_weight
    }
    fn grid_interval(&self) -> T {
        self.grid_interval
    }
    fn tolerance(&self) -> T {
        self.tolerance.unwrap_or(self.grid_interval)
    }
    fn initialization(&self) -> Initialization {
        self.initialization
    }
    fn seed(&self) -> u64 {
        self.seed
    }
    fn max_iterations(&self) -> usize {
        self.max_iterations
    }
    fn max_redraws(&self) -> usize {
        self.max_redraws
    }
    fn perturbation_retry(&self) -> bool {
        self.perturbation_retry
    }
}

/// Minimax design parameters setter trait.
///
/// This trait is implemented by [`MinimaxParameters`] and allows the default
/// values to be modified by chaining calls to its methods.
pub trait ParametersBuilder<T>: DesignParameters<T> {
    /// Sets the passband and stopband weights.
    fn set_weights(&mut self, pass_weight: T, stop_weight: T) -> &mut Self;

    /// Sets the spacing of the analog frequency grid.
    ///
    /// Unless a tolerance has been set explicitly, this is also the
    /// convergence tolerance.
    fn set_grid_interval(&mut self, grid_interval: T) -> &mut Self;

    /// Sets the convergence tolerance.
    ///
    /// See [`DesignParameters::tolerance`].
    fn set_tolerance(&mut self, tolerance: T) -> &mut Self;

    /// Sets how the initial extremal set is chosen.
    fn set_initialization(&mut self, initialization: Initialization) -> &mut Self;

    /// Sets the seed of the pseudorandom initialization.
    fn set_seed(&mut self, seed: u64) -> &mut Self;

    /// Sets the maximum number of exchange iterations.
    fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self;

    /// Sets how many times a single initial candidate may be redrawn.
    fn set_max_redraws(&mut self, max_redraws: usize) -> &mut Self;

    /// Enables or disables the perturbation retry of singular systems.
    fn set_perturbation_retry(&mut self, enabled: bool) -> &mut Self;
}

impl<T: Float> MinimaxParameters<T> {
    /// Creates new design parameters.
    ///
    /// The `length` argument is the number of taps of the FIR filter, which
    /// must be odd. Both weights default to one, the grid interval defaults to
    /// `1e-4` (which is also the default tolerance), the initialization is
    /// pseudorandom with seed zero, and at most 100 iterations are performed.
    pub fn new(length: usize, band_spec: BandSpec<T>) -> MinimaxParameters<T> {
        MinimaxParameters {
            length,
            band_spec,
            pass_weight: T::one(),
            stop_weight: T::one(),
            grid_interval: T::from(1e-4).unwrap(),
            tolerance: None,
            initialization: Initialization::Random,
            seed: 0,
            max_iterations: 100,
            max_redraws: 10_000,
            perturbation_retry: true,
        }
    }
}

impl<T: Float> ParametersBuilder<T> for MinimaxParameters<T> {
    fn set_weights(&mut self, pass_weight: T, stop_weight: T) -> &mut Self {
        self.pass_weight = pass_weight;
        self.stop_weight = stop_weight;
        self
    }

    fn set_grid_interval(&mut self, grid_interval: T) -> &mut Self {
        self.grid_interval = grid_interval;
        self
    }

    fn set_tolerance(&mut self, tolerance: T) -> &mut Self {
        self.tolerance = Some(tolerance);
        self
    }

    fn set_initialization(&mut self, initialization: Initialization) -> &mut Self {
        self.initialization = initialization;
        self
    }

    fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    fn set_max_redraws(&mut self, max_redraws: usize) -> &mut Self {
        self.max_redraws = max_redraws;
        self
    }

    fn set_perturbation_retry(&mut self, enabled: bool) -> &mut Self {
        self.perturbation_retry = enabled;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn invalid<T: std::fmt::Debug>(result: Result<T>) -> InvalidSpecification {
        match result {
            Err(Error::InvalidSpecification(e)) => e,
            other => panic!("expected invalid specification, got {other:?}"),
        }
    }

    #[test]
    fn band_limits() {
        assert!(Band::new(0.0, 0.5).is_ok());
        assert_eq!(
            invalid(Band::new(0.3, 0.2)),
            InvalidSpecification::BandLimitsWrongOrder
        );
        assert_eq!(
            invalid(Band::new(-0.1, 0.2)),
            InvalidSpecification::BandLimitsOutOfBounds
        );
        assert_eq!(
            invalid(Band::new(0.1, 0.6)),
            InvalidSpecification::BandLimitsOutOfBounds
        );
        assert_eq!(
            invalid(Band::new(f64::NAN, 0.2)),
            InvalidSpecification::BandLimitsOutOfBounds
        );
    }

    #[test]
    fn filter_kind() {
        let lowpass = BandSpec::lowpass(0.2, 0.3).unwrap();
        assert_eq!(lowpass.kind(), FilterKind::Lowpass);
        assert_eq!(lowpass.edge_freq(), 0.25);
        let highpass = BandSpec::highpass(0.2, 0.3).unwrap();
        assert_eq!(highpass.kind(), FilterKind::Highpass);
        assert_eq!(highpass.passband(), Band::new(0.3, 0.5).unwrap());
    }

    #[test]
    fn degenerate_transition() {
        assert_eq!(
            invalid(BandSpec::lowpass(0.2, 0.2)),
            InvalidSpecification::DegenerateTransition
        );
        assert_eq!(
            invalid(BandSpec::lowpass(0.0, 0.2)),
            InvalidSpecification::DegeneratePassband
        );
    }

    #[test]
    fn non_adjacent_bands() {
        let passband = Band::new(0.0, 0.2).unwrap();
        assert_eq!(
            invalid(BandSpec::new(passband, Band::new(0.25, 0.3).unwrap())),
            InvalidSpecification::NotAdjacent
        );
        assert_eq!(
            invalid(BandSpec::new(
                Band::new(0.1, 0.2).unwrap(),
                Band::new(0.2, 0.3).unwrap()
            )),
            InvalidSpecification::NotSingleBandPair
        );
    }

    #[test]
    fn tolerance_follows_grid_interval() {
        let mut params = MinimaxParameters::new(17, BandSpec::lowpass(0.2, 0.3).unwrap());
        assert_eq!(params.tolerance(), 1e-4);
        params.set_grid_interval(1e-3);
        assert_eq!(params.tolerance(), 1e-3);
        params.set_tolerance(1e-6);
        assert_eq!(params.tolerance(), 1e-6);
    }
}
