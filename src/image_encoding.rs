use crate::params::{self, ImageEncodingParams};
use crate::poisson;
use crate::types::{FiringRate, SpikeTrain, SpikeTrainSet};
use crate::util;
use core_affinity::CoreId;
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use simple_error::{try_with, SimpleError, SimpleResult};
use std::ops::Range;
use std::thread;

/// Converts a sequence of intensity images into one Poisson spike train per
/// pixel. Image `i` is presented during `[i * (duration + silence), i *
/// (duration + silence) + duration)`; spikes of successive images are
/// concatenated per pixel.
///
/// Every (image, pixel) pair draws from its own generator seeded from
/// `seed_override`, so the result does not depend on the number of threads.
pub fn images_to_spike_trains(
    images: &[Vec<f64>],
    params: &ImageEncodingParams,
) -> SimpleResult<SpikeTrainSet> {
    try_with!(
        params::validate_image_encoding_params(params),
        "invalid image encoding parameters"
    );

    let num_neurons = params.num_neurons();

    let rates = images
        .iter()
        .enumerate()
        .map(|(image_idx, image)| image_to_rates(image_idx, image, params))
        .collect::<SimpleResult<Vec<_>>>()?;

    let num_threads = get_num_threads(params);
    let pin_threads = params.technical_params.pin_threads;

    let partition_results = thread::scope(|scope| {
        let join_handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let rates = &rates;
                scope.spawn(move || {
                    if pin_threads {
                        core_affinity::set_for_current(CoreId { id: thread_id });
                    }

                    let partition_range =
                        util::get_partition_range(num_threads, thread_id, num_neurons);
                    generate_partition(partition_range, rates, params)
                })
            })
            .collect();

        join_handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(SimpleError::new("spike generation thread panicked")))
            })
            .collect::<Vec<_>>()
    });

    let mut spike_trains = Vec::with_capacity(num_neurons);

    for partition_result in partition_results {
        spike_trains.extend(partition_result?);
    }

    debug!(
        "generated {} spikes for {} images on {} neurons",
        spike_trains.iter().map(Vec::len).sum::<usize>(),
        images.len(),
        num_neurons
    );

    Ok(spike_trains)
}

/// Scales the intensities of one image so that they sum up to `max_freq`.
pub fn normalize_image(image: &[f64], max_freq: FiringRate) -> SimpleResult<Vec<FiringRate>> {
    let total: f64 = image.iter().sum();

    if !(total > 0.0) {
        return Err(SimpleError::new("image has zero total intensity"));
    }

    Ok(image.iter().map(|value| value / total * max_freq).collect())
}

fn image_to_rates(
    image_idx: usize,
    image: &[f64],
    params: &ImageEncodingParams,
) -> SimpleResult<Vec<FiringRate>> {
    if image.len() != params.num_neurons() {
        return Err(SimpleError::new(format!(
            "image {} has {} pixels, expected {}",
            image_idx,
            image.len(),
            params.num_neurons()
        )));
    }

    if image.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(SimpleError::new(format!(
            "image {} contains a negative or non-finite intensity",
            image_idx
        )));
    }

    if params.max_freq > 0.0 {
        normalize_image(image, params.max_freq).map_err(|_| {
            SimpleError::new(format!("image {} has zero total intensity", image_idx))
        })
    } else {
        Ok(image.to_vec())
    }
}

fn generate_partition(
    partition_range: Range<usize>,
    rates: &[Vec<FiringRate>],
    params: &ImageEncodingParams,
) -> SimpleResult<SpikeTrainSet> {
    let seed = params.technical_params.seed_override.unwrap_or(0);
    let period = params.duration + params.silence;

    partition_range
        .map(|nid| {
            let mut spike_train = SpikeTrain::new();

            for (image_idx, image_rates) in rates.iter().enumerate() {
                let t_start = image_idx as f64 * period;
                let t_stop = t_start + params.duration;

                let mut rng = StdRng::seed_from_u64(util::calculate_hash(&(seed, image_idx, nid)));

                spike_train.extend(poisson::generate_spike_train(
                    image_rates[nid],
                    t_start,
                    t_stop,
                    &mut rng,
                )?);
            }

            if !util::is_strictly_increasing(&spike_train) {
                return Err(SimpleError::new(format!(
                    "spike train of neuron {} is not strictly increasing",
                    nid
                )));
            }

            Ok(spike_train)
        })
        .collect()
}

fn get_num_threads(params: &ImageEncodingParams) -> usize {
    params
        .technical_params
        .num_threads
        .unwrap_or_else(num_cpus::get)
}
