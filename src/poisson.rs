use rand::{distributions::Open01, Rng};
use simple_error::{SimpleError, SimpleResult};

use crate::types::{FiringRate, SpikeTrain};

const INVALID_RATE_MSG: &str = "rate must be a non-negative finite number";

/// Draws the time until the next event of a Poisson process (in seconds) by
/// inverse CDF sampling of the exponential distribution.
///
/// Only strictly positive rates are accepted. A rate of zero has no finite
/// interval; callers are expected to short-circuit that case.
pub fn next_interval<R: Rng + ?Sized>(rate: FiringRate, rng: &mut R) -> SimpleResult<f64> {
    if !(rate > 0.0) || !rate.is_finite() {
        return Err(SimpleError::new(
            "rate must be strictly positive to draw an interval",
        ));
    }

    // open interval (0, 1): ln(1 - u) is finite and the interval never zero
    let u: f64 = rng.sample(Open01);

    Ok(-(1.0 - u).ln() / rate)
}

/// Generates the spike times (ms) of one neuron firing at `rate` Hz within
/// the half-open window `[t_start, t_stop)`.
pub fn generate_spike_train<R: Rng + ?Sized>(
    rate: FiringRate,
    t_start: f64,
    t_stop: f64,
    rng: &mut R,
) -> SimpleResult<SpikeTrain> {
    if rate.is_nan() || rate < 0.0 || rate.is_infinite() {
        return Err(SimpleError::new(INVALID_RATE_MSG));
    }

    let mut spike_train = Vec::new();

    if rate == 0.0 || t_start >= t_stop {
        return Ok(spike_train);
    }

    let mut t = t_start + next_interval(rate, rng)? * 1000.0;

    while t < t_stop {
        spike_train.push(t);
        t += next_interval(rate, rng)? * 1000.0;
    }

    Ok(spike_train)
}
