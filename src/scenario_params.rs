use serde::{Deserialize, Serialize};
use spikeaer::params::{AerParams, ImageEncodingParams};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub num_images: usize,
    pub image_encoding_params: ImageEncodingParams,
    pub aer_params: AerParams,
}

pub fn get_scenario_params() -> ScenarioParams {
    let params_yaml_str = r#"
num_images: 20
image_encoding_params:
  image_height: 28
  image_width: 28
  max_freq: 2000.0
  duration: 350.0
  silence: 150.0
  technical_params:
    num_threads: null
    pin_threads: false
    seed_override: 17
aer_params:
  image_size: 28
  addr_scale: 128
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}

/// Random digit-like images: a bright square of random size and position on a
/// dim background.
pub fn make_images<R: rand::Rng>(
    rng: &mut R,
    num_images: usize,
    image_height: usize,
    image_width: usize,
) -> Vec<Vec<f64>> {
    use rand::distributions::{Distribution, Uniform};

    let background_dist = Uniform::new(0.0, 10.0);

    (0..num_images)
        .map(|_| {
            let side = rng.gen_range(1..=image_height.min(image_width));
            let top = rng.gen_range(0..=image_height - side);
            let left = rng.gen_range(0..=image_width - side);

            (0..image_height * image_width)
                .map(|idx| {
                    let (row, col) = (idx / image_width, idx % image_width);
                    if (top..top + side).contains(&row) && (left..left + side).contains(&col) {
                        255.0
                    } else {
                        background_dist.sample(&mut *rng)
                    }
                })
                .collect()
        })
        .collect()
}
