use log::{debug, warn};
use simple_error::{SimpleError, SimpleResult};
use std::fs;
use std::path::Path;

use crate::aer::{self, EncodeOutcome};
use crate::types::{self, SpikeTrainSet};

/// Reads and decodes an AER file. A file that does not exist yields silent
/// ON and OFF trains for every pixel.
pub fn read_aer_file<P: AsRef<Path>>(
    path: P,
    image_size: u32,
) -> SimpleResult<(SpikeTrainSet, SpikeTrainSet)> {
    let path = path.as_ref();

    if !path.exists() {
        debug!("{} does not exist, no events", path.display());
        let num_neurons = image_size as usize * image_size as usize;
        return Ok((
            types::empty_spike_train_set(num_neurons),
            types::empty_spike_train_set(num_neurons),
        ));
    }

    let bytes = fs::read(path).map_err(|err| {
        SimpleError::with(&format!("failed to read {}", path.display()), err)
    })?;

    aer::decode(&bytes, image_size)
}

/// Encodes the spike trains and writes them to `path`. Nothing is written if
/// there are no events, which the returned outcome reports.
pub fn write_aer_file<P: AsRef<Path>>(
    path: P,
    on_spike_trains: &[Vec<f64>],
    off_spike_trains: &[Vec<f64>],
    image_size: u32,
    addr_scale: u32,
) -> SimpleResult<EncodeOutcome> {
    let path = path.as_ref();
    let outcome = aer::encode(on_spike_trains, off_spike_trains, image_size, addr_scale)?;

    if outcome.has_events() {
        fs::write(path, outcome.bytes()).map_err(|err| {
            SimpleError::with(&format!("failed to write {}", path.display()), err)
        })?;
    } else {
        warn!("no events to write, {} left untouched", path.display());
    }

    Ok(outcome)
}
