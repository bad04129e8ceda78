use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use spikeaer::{aer, image_encoding};

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    env_logger::init();

    let mut params = scenario_params::get_scenario_params();
    params.num_images = 500;

    let encoding_params = &params.image_encoding_params;
    let mut rng = StdRng::seed_from_u64(0);
    let images = scenario_params::make_images(
        &mut rng,
        params.num_images,
        encoding_params.image_height,
        encoding_params.image_width,
    );

    let wall_start = Instant::now();
    let spike_trains = image_encoding::images_to_spike_trains(&images, encoding_params).unwrap();
    let generation_time = wall_start.elapsed();

    let spike_count: usize = spike_trains.iter().map(Vec::len).sum();

    let wall_start = Instant::now();
    let outcome = aer::encode(
        &spike_trains,
        &[],
        params.aer_params.image_size,
        params.aer_params.addr_scale,
    )
    .unwrap();
    let encoding_time = wall_start.elapsed();

    let wall_start = Instant::now();
    let (decoded, _) = aer::decode(outcome.bytes(), params.aer_params.image_size).unwrap();
    let decoding_time = wall_start.elapsed();

    let generation_throughput = spike_count as f64 / generation_time.as_secs_f64();
    let encoding_throughput = spike_count as f64 / encoding_time.as_secs_f64();
    let decoding_throughput = spike_count as f64 / decoding_time.as_secs_f64();

    eprintln!("Spikes per image: {}", spike_count as f64 / params.num_images as f64);
    eprintln!(
        "Generation throughput: {:.3e} spikes/s ({:.3} ns per spike)",
        generation_throughput,
        1e9 / generation_throughput
    );
    eprintln!(
        "Encoding throughput: {:.3e} events/s ({:.3} ns per event)",
        encoding_throughput,
        1e9 / encoding_throughput
    );
    eprintln!(
        "Decoding throughput: {:.3e} events/s ({:.3} ns per event)",
        decoding_throughput,
        1e9 / decoding_throughput
    );
    eprintln!(
        "Decoded spikes: {}",
        decoded.iter().map(Vec::len).sum::<usize>()
    );
}
