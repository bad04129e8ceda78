pub mod aer;
pub mod aer_file;
pub mod image_encoding;
pub mod params;
pub mod poisson;
pub mod types;

mod util;
