use crate::types::{Band, BandSpec, FilterKind};
use num_traits::{Float, FloatConst};

// Dense sampling of [0, 0.5] with the weight and desired response of each
// sample.
//
// Grid points are addressed by index everywhere in the algorithm, so that
// looking up the weight or desired response of an extremal frequency never
// requires comparing floating point frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid<T> {
    freqs: Vec<T>,
    // cos(2*pi*f) for each grid frequency, used to evaluate the cosine series
    cosines: Vec<T>,
    weights: Vec<T>,
    desired: Vec<T>,
    transition: Band<T>,
    passband_midpoint: usize,
    sentinels: [usize; 4],
}

impl<T: Float + FloatConst> FrequencyGrid<T> {
    // Builds a grid with num_intervals + 1 points, f_i = i / (2 * num_intervals).
    pub fn new(
        band_spec: &BandSpec<T>,
        pass_weight: T,
        stop_weight: T,
        num_intervals: usize,
    ) -> FrequencyGrid<T> {
        assert!(num_intervals > 0);
        let scale = T::from(2 * num_intervals).unwrap();
        let freqs: Vec<T> = (0..=num_intervals)
            .map(|i| T::from(i).unwrap() / scale)
            .collect();
        let cosines = freqs.iter().map(|&f| (T::TAU() * f).cos()).collect();

        let passband = band_spec.passband();
        let transition = band_spec.transition();
        let edge_freq = band_spec.edge_freq();
        let kind = band_spec.kind();
        let zero = T::zero();
        let one = T::one();
        let (weights, desired) = freqs
            .iter()
            .map(|&f| {
                if passband.contains(f) {
                    (pass_weight, one)
                } else if transition.contains_strictly(f) {
                    // The desired response steps exactly at edge_freq, which
                    // lies inside the dead zone.
                    let d = match kind {
                        FilterKind::Lowpass => f < edge_freq,
                        FilterKind::Highpass => f > edge_freq,
                    };
                    (zero, if d { one } else { zero })
                } else {
                    (stop_weight, zero)
                }
            })
            .unzip();

        let mut grid = FrequencyGrid {
            freqs,
            cosines,
            weights,
            desired,
            transition,
            passband_midpoint: 0,
            sentinels: [0; 4],
        };
        grid.passband_midpoint = grid.nearest_index(passband.midpoint());
        // The edge sentinels are the closest grid points outside the
        // transition band, even when the edges fall between grid points.
        let begin = transition.begin();
        let end = transition.end();
        grid.sentinels = [
            0,
            grid.freqs.partition_point(|&f| f <= begin) - 1,
            grid.freqs.partition_point(|&f| f < end),
            num_intervals,
        ];
        grid
    }

    // Index of the grid point closest to f.
    pub fn nearest_index(&self, f: T) -> usize {
        let n = self.num_intervals();
        (f * T::from(2 * n).unwrap())
            .round()
            .to_usize()
            .unwrap_or(0)
            .min(n)
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn num_intervals(&self) -> usize {
        self.freqs.len() - 1
    }

    pub fn freq(&self, index: usize) -> T {
        self.freqs[index]
    }

    pub fn cosine(&self, index: usize) -> T {
        self.cosines[index]
    }

    pub fn weight(&self, index: usize) -> T {
        self.weights[index]
    }

    pub fn desired(&self, index: usize) -> T {
        self.desired[index]
    }

    pub fn is_transition(&self, index: usize) -> bool {
        self.transition.contains_strictly(self.freqs[index])
    }

    // Number of grid points that may belong to an extremal set.
    pub fn admissible_count(&self) -> usize {
        (0..self.len()).filter(|&i| !self.is_transition(i)).count()
    }

    pub fn passband_midpoint(&self) -> usize {
        self.passband_midpoint
    }

    // Grid indices of the lower grid boundary, the two transition band edges
    // and the upper grid boundary, in this order.
    pub fn sentinels(&self) -> [usize; 4] {
        self.sentinels
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lowpass_grid() -> FrequencyGrid<f64> {
        let band_spec = BandSpec::lowpass(0.2, 0.3).unwrap();
        FrequencyGrid::new(&band_spec, 1.0, 0.6, 10_000)
    }

    #[test]
    fn lowpass_targets() {
        let grid = lowpass_grid();
        assert_eq!(grid.len(), 10_001);
        assert_eq!(grid.freq(0), 0.0);
        assert_eq!(grid.freq(10_000), 0.5);
        // passband edge is inclusive
        assert_eq!(grid.freq(4000), 0.2);
        assert_eq!(grid.weight(4000), 1.0);
        assert_eq!(grid.desired(4000), 1.0);
        // dead zone, desired steps at 0.25
        assert_eq!(grid.weight(4001), 0.0);
        assert_eq!(grid.desired(4001), 1.0);
        assert_eq!(grid.desired(4999), 1.0);
        assert_eq!(grid.desired(5000), 0.0);
        assert_eq!(grid.weight(5999), 0.0);
        // stopband starts at the transition band end
        assert_eq!(grid.weight(6000), 0.6);
        assert_eq!(grid.desired(6000), 0.0);
        assert!(grid.is_transition(5000));
        assert!(!grid.is_transition(6000));
        assert_eq!(grid.admissible_count(), 10_001 - 1999);
    }

    #[test]
    fn highpass_targets() {
        let band_spec = BandSpec::highpass(0.2, 0.3).unwrap();
        let grid = FrequencyGrid::new(&band_spec, 2.0, 1.0, 1000);
        assert_eq!(grid.weight(0), 1.0);
        assert_eq!(grid.desired(0), 0.0);
        assert_eq!(grid.desired(450), 0.0);
        assert_eq!(grid.desired(500), 0.0);
        assert_eq!(grid.desired(501), 1.0);
        assert_eq!(grid.weight(501), 0.0);
        assert_eq!(grid.weight(600), 2.0);
        assert_eq!(grid.desired(1000), 1.0);
        assert_eq!(grid.passband_midpoint(), 800);
    }

    #[test]
    fn sentinels() {
        let grid = lowpass_grid();
        assert_eq!(grid.sentinels(), [0, 4000, 6000, 10_000]);
        assert_eq!(grid.passband_midpoint(), 2000);
    }

    #[test]
    fn deterministic() {
        let a = lowpass_grid();
        let b = lowpass_grid();
        for i in 0..a.len() {
            assert_eq!(a.freq(i).to_bits(), b.freq(i).to_bits());
            assert_eq!(a.cosine(i).to_bits(), b.cosine(i).to_bits());
            assert_eq!(a.weight(i).to_bits(), b.weight(i).to_bits());
            assert_eq!(a.desired(i).to_bits(), b.desired(i).to_bits());
        }
    }

    #[test]
    fn sentinels_off_grid_edges() {
        let band_spec = BandSpec::lowpass(0.2004, 0.3004).unwrap();
        let grid = FrequencyGrid::new(&band_spec, 1.0, 1.0, 1000);
        let [_, begin, end, _] = grid.sentinels();
        // 0.2004 and 0.3004 lie between grid points 400/401 and 600/601
        assert_eq!(grid.sentinels(), [0, 400, 601, 1000]);
        assert!(!grid.is_transition(begin));
        assert!(!grid.is_transition(end));
        assert!(grid.is_transition(begin + 1));
        assert!(grid.is_transition(end - 1));
        assert_eq!(grid.weight(begin), 1.0);
        assert_eq!(grid.desired(begin), 1.0);
        assert_eq!(grid.desired(end), 0.0);
    }
}
