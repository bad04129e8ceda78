use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

/// Largest image side representable by the 7 bit x/y fields of an AER address.
pub const MAX_AER_IMAGE_SIZE: u32 = 128;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEncodingParams {
    pub image_height: usize,
    pub image_width: usize,
    /// Sum of the firing rates of all pixels of one image (Hz). Zero leaves
    /// the intensities untouched and uses them as rates directly.
    pub max_freq: f64,
    /// Presentation time of each image (ms).
    pub duration: f64,
    /// Quiescent gap between two presentations (ms).
    pub silence: f64,
    pub technical_params: TechnicalParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerParams {
    pub image_size: u32,
    /// Row stride used when packing the y coordinate into an address.
    pub addr_scale: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalParams {
    pub num_threads: Option<usize>,
    pub pin_threads: bool,
    pub seed_override: Option<u64>,
}

impl ImageEncodingParams {
    pub fn num_neurons(&self) -> usize {
        self.image_height * self.image_width
    }
}

impl AerParams {
    pub fn num_neurons(&self) -> usize {
        self.image_size as usize * self.image_size as usize
    }
}

impl Default for ImageEncodingParams {
    fn default() -> Self {
        Self {
            image_height: 28,
            image_width: 28,
            max_freq: 1000.0,
            duration: 1000.0,
            silence: 200.0,
            technical_params: TechnicalParams::default(),
        }
    }
}

impl Default for AerParams {
    fn default() -> Self {
        Self {
            image_size: 28,
            addr_scale: 128,
        }
    }
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            num_threads: Some(1),
            pin_threads: false,
            seed_override: None,
        }
    }
}

pub fn validate_image_encoding_params(params: &ImageEncodingParams) -> Result<(), SimpleError> {
    if params.image_height == 0 || params.image_width == 0 {
        return Err(SimpleError::new(
            "image_height and image_width must be strictly positive",
        ));
    }

    if !params.max_freq.is_finite() || params.max_freq < 0.0 {
        return Err(SimpleError::new("max_freq must be finite and non-negative"));
    }

    if !params.duration.is_finite() || params.duration < 0.0 {
        return Err(SimpleError::new("duration must be finite and non-negative"));
    }

    if !params.silence.is_finite() || params.silence < 0.0 {
        return Err(SimpleError::new("silence must be finite and non-negative"));
    }

    validate_technical_params(&params.technical_params)?;

    Ok(())
}

pub fn validate_aer_params(params: &AerParams) -> Result<(), SimpleError> {
    validate_image_size(params.image_size)?;

    if params.addr_scale == 0 {
        return Err(SimpleError::new("addr_scale must be strictly positive"));
    }

    Ok(())
}

pub fn validate_image_size(image_size: u32) -> Result<(), SimpleError> {
    if image_size == 0 || image_size > MAX_AER_IMAGE_SIZE {
        return Err(SimpleError::new(format!(
            "image_size must be in [1, {}]",
            MAX_AER_IMAGE_SIZE
        )));
    }

    Ok(())
}

fn validate_technical_params(technical_params: &TechnicalParams) -> Result<(), SimpleError> {
    if let Some(num_threads) = technical_params.num_threads {
        if num_threads == 0 {
            return Err(SimpleError::new("num_threads must be strictly positive"));
        }

        if num_cpus::get() < num_threads {
            return Err(SimpleError::new(
                "num_threads must not be greater than number of available CPUs",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_image_encoding_params(&ImageEncodingParams::default()).is_ok());
        assert!(validate_aer_params(&AerParams::default()).is_ok());
    }

    #[test]
    fn zero_image_height() {
        let mut params = ImageEncodingParams::default();
        params.image_height = 0;
        let result = validate_image_encoding_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "image_height and image_width must be strictly positive"
        );
    }

    #[test]
    fn negative_max_freq() {
        let mut params = ImageEncodingParams::default();
        params.max_freq = -1.0;
        let result = validate_image_encoding_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "max_freq must be finite and non-negative"
        );
    }

    #[test]
    fn nan_duration() {
        let mut params = ImageEncodingParams::default();
        params.duration = f64::NAN;
        let result = validate_image_encoding_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "duration must be finite and non-negative"
        );
    }

    #[test]
    fn negative_silence() {
        let mut params = ImageEncodingParams::default();
        params.silence = -0.5;
        let result = validate_image_encoding_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "silence must be finite and non-negative"
        );
    }

    #[test]
    fn zero_num_threads() {
        let mut params = ImageEncodingParams::default();
        params.technical_params.num_threads = Some(0);
        let result = validate_image_encoding_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "num_threads must be strictly positive"
        );
    }

    #[test]
    fn too_high_num_threads() {
        let mut params = ImageEncodingParams::default();
        params.technical_params.num_threads = Some(num_cpus::get() + 1);
        let result = validate_image_encoding_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "num_threads must not be greater than number of available CPUs"
        );
    }

    #[test]
    fn too_large_image_size() {
        let params = AerParams {
            image_size: 129,
            addr_scale: 128,
        };
        let result = validate_aer_params(&params);

        assert_eq!(result.unwrap_err().as_str(), "image_size must be in [1, 128]");
    }

    #[test]
    fn zero_addr_scale() {
        let params = AerParams {
            image_size: 28,
            addr_scale: 0,
        };
        let result = validate_aer_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "addr_scale must be strictly positive"
        );
    }

    #[test]
    fn yaml_round_trip() {
        let yaml = r#"
image_height: 2
image_width: 3
max_freq: 50.0
duration: 100.0
silence: 10.0
technical_params:
  num_threads: null
  pin_threads: false
  seed_override: 42
"#;
        let params: ImageEncodingParams = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(params.num_neurons(), 6);
        assert_eq!(params.technical_params.num_threads, None);
        assert_eq!(params.technical_params.seed_override, Some(42));
        assert!(validate_image_encoding_params(&params).is_ok());
    }
}
