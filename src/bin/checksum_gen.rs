use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use spikeaer::{aer, image_encoding};

#[path = "../scenario_params.rs"]
mod scenario_params;

#[derive(Debug, Serialize)]
struct Checksums {
    num_on_spikes: usize,
    num_off_spikes: usize,
    num_events: usize,
    address_checksum: u64,
    timestamp_checksum: u64,
    decoded_spike_time_checksum: f64,
}

fn main() {
    env_logger::init();

    let params = scenario_params::get_scenario_params();
    let encoding_params = &params.image_encoding_params;
    let mut rng = StdRng::seed_from_u64(0);

    let images = scenario_params::make_images(
        &mut rng,
        params.num_images,
        encoding_params.image_height,
        encoding_params.image_width,
    );

    // OFF events from the negative of each image
    let negatives: Vec<Vec<f64>> = images
        .iter()
        .map(|image| image.iter().map(|value| 255.0 - value).collect())
        .collect();

    let on_spike_trains = image_encoding::images_to_spike_trains(&images, encoding_params).unwrap();
    let off_spike_trains =
        image_encoding::images_to_spike_trains(&negatives, encoding_params).unwrap();

    let outcome = aer::encode(
        &on_spike_trains,
        &off_spike_trains,
        params.aer_params.image_size,
        params.aer_params.addr_scale,
    )
    .unwrap();

    let mut address_checksum = 0u64;
    let mut timestamp_checksum = 0u64;

    for (idx, event) in outcome.events().iter().enumerate() {
        address_checksum += idx as u64 * event.neuron_id as u64;
        timestamp_checksum += event.timestamp_us as u64;
    }

    let (decoded_on, decoded_off) =
        aer::decode(outcome.bytes(), params.aer_params.image_size).unwrap();

    let decoded_spike_time_checksum = decoded_on
        .iter()
        .chain(decoded_off.iter())
        .flatten()
        .sum();

    let checksums = Checksums {
        num_on_spikes: on_spike_trains.iter().map(Vec::len).sum(),
        num_off_spikes: off_spike_trains.iter().map(Vec::len).sum(),
        num_events: outcome.events().len(),
        address_checksum,
        timestamp_checksum,
        decoded_spike_time_checksum,
    };

    println!("{}", serde_json::to_string_pretty(&checksums).unwrap());
}
