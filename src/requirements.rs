use crate::{
    error::Result,
    types::{BandSpec, MinimaxParameters},
};
use num_traits::Float;

/// Creates parameters for a lowpass filter.
///
/// The passband is `[0.0, passband_end]`, the transition band is
/// `[passband_end, stopband_begin]` and the stopband is
/// `[stopband_begin, 0.5]`. The `length` parameter indicates the number of
/// taps of the FIR filter to be designed.
///
/// This is a shortcut for [`MinimaxParameters::new`] with
/// [`BandSpec::lowpass`]. The remaining parameters take the defaults of
/// `MinimaxParameters`, and they can be changed by using the methods of the
/// [`ParametersBuilder`](crate::ParametersBuilder) trait.
pub fn lowpass<T: Float>(
    length: usize,
    passband_end: T,
    stopband_begin: T,
) -> Result<MinimaxParameters<T>> {
    Ok(MinimaxParameters::new(
        length,
        BandSpec::lowpass(passband_end, stopband_begin)?,
    ))
}

/// Creates parameters for a highpass filter.
///
/// The stopband is `[0.0, stopband_end]`, the transition band is
/// `[stopband_end, passband_begin]` and the passband is
/// `[passband_begin, 0.5]`. See [`lowpass`] for the remaining details.
pub fn highpass<T: Float>(
    length: usize,
    stopband_end: T,
    passband_begin: T,
) -> Result<MinimaxParameters<T>> {
    Ok(MinimaxParameters::new(
        length,
        BandSpec::highpass(stopband_end, passband_begin)?,
    ))
}
