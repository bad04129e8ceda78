//! Address-Event Representation (AER-DAT 2.0) codec.
//!
//! A file consists of a short text header followed by a flat sequence of
//! big-endian `(address: u32, timestamp: u32)` pairs, timestamps in us. The
//! address carries the pixel coordinates and the polarity of the event:
//!
//! ```text
//! bit  0     polarity (0: ON, 1: OFF)
//! bits 1-7   x
//! bits 8-14  y
//! ```

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use chrono::{Local, NaiveDateTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simple_error::{try_with, SimpleError, SimpleResult};
use std::io::Write;

use crate::params;
use crate::types::{self, SpikeTrainSet};

const FORMAT_TAG: &str = "#!AER-DAT";
const FORMAT_VERSION: f32 = 2.0;
const NUM_HEADER_LINES: usize = 5;
const EVENT_SIZE: usize = 8;

const X_MASK: u32 = 0xFE;
const Y_MASK: u32 = 0x7F00;
const X_SHIFT: u32 = 1;
const Y_SHIFT: u32 = 8;
const POLARITY_MASK: u32 = 0x1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    On,
    Off,
}

impl Polarity {
    fn from_bit(bit: u32) -> Self {
        if bit == 0 {
            Polarity::On
        } else {
            Polarity::Off
        }
    }

    /// Term added to the packed coordinates: 0 for ON, -1 for OFF.
    fn address_term(self) -> i64 {
        match self {
            Polarity::On => 0,
            Polarity::Off => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AerEvent {
    pub timestamp_us: u32,
    pub neuron_id: usize,
    pub polarity: Polarity,
}

/// Events in file order together with the serialized file content.
#[derive(Debug, Clone)]
pub struct AerRecording {
    pub events: Vec<AerEvent>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum EncodeOutcome {
    Encoded(AerRecording),
    /// Neither polarity contributed any event. Holds the header-only buffer.
    NoEvents(Vec<u8>),
}

impl EncodeOutcome {
    pub fn bytes(&self) -> &[u8] {
        match self {
            EncodeOutcome::Encoded(recording) => &recording.bytes,
            EncodeOutcome::NoEvents(bytes) => bytes,
        }
    }

    pub fn events(&self) -> &[AerEvent] {
        match self {
            EncodeOutcome::Encoded(recording) => &recording.events,
            EncodeOutcome::NoEvents(_) => &[],
        }
    }

    pub fn has_events(&self) -> bool {
        matches!(self, EncodeOutcome::Encoded(_))
    }
}

/// Packs pixel coordinates and polarity into an address. OFF events subtract
/// one from the packed coordinates, wrapping like an unsigned 32 bit value.
pub fn pack_address(x: u32, y: u32, polarity: Polarity, addr_scale: u32) -> u32 {
    let packed = ((x as i64) << X_SHIFT)
        + ((y as i64) << X_SHIFT) * addr_scale as i64
        + polarity.address_term();
    packed as u32
}

/// Inverse of [`pack_address`] for `addr_scale == 128`. The polarity bit is
/// added back to the address before the coordinates are masked out.
pub fn unpack_address(address: u32) -> (u32, u32, Polarity) {
    let polarity_bit = address & POLARITY_MASK;
    let address = address.wrapping_add(polarity_bit);
    let x = (address & X_MASK) >> X_SHIFT;
    let y = (address & Y_MASK) >> Y_SHIFT;
    (x, y, Polarity::from_bit(polarity_bit))
}

/// Decodes an AER file into ON and OFF spike trains (ms), each with
/// `image_size * image_size` entries. Empty input decodes to silent trains.
/// Events keep their file order within a neuron; events that map outside of
/// the image are dropped.
pub fn decode(bytes: &[u8], image_size: u32) -> SimpleResult<(SpikeTrainSet, SpikeTrainSet)> {
    try_with!(params::validate_image_size(image_size), "invalid image size");

    let num_neurons = image_size as usize * image_size as usize;
    let mut on_spike_trains = types::empty_spike_train_set(num_neurons);
    let mut off_spike_trains = types::empty_spike_train_set(num_neurons);

    if bytes.is_empty() {
        return Ok((on_spike_trains, off_spike_trains));
    }

    let body = &bytes[header_len(bytes)?..];

    if body.len() % EVENT_SIZE != 0 {
        return Err(SimpleError::new(format!(
            "truncated AER event data: {} trailing bytes",
            body.len() % EVENT_SIZE
        )));
    }

    let mut num_dropped = 0usize;

    for chunk in body.chunks_exact(EVENT_SIZE) {
        let address = BigEndian::read_u32(&chunk[..4]);
        let timestamp_us = BigEndian::read_u32(&chunk[4..]);

        let (x, y, polarity) = unpack_address(address);
        let neuron_id = (y * image_size + x) as usize;

        if neuron_id >= num_neurons {
            num_dropped += 1;
            continue;
        }

        let t = timestamp_us as f64 / 1000.0;

        match polarity {
            Polarity::On => on_spike_trains[neuron_id].push(t),
            Polarity::Off => off_spike_trains[neuron_id].push(t),
        }
    }

    if num_dropped > 0 {
        warn!(
            "dropped {} AER events outside of the {}x{} image",
            num_dropped, image_size, image_size
        );
    }

    debug!(
        "decoded {} AER events",
        body.len() / EVENT_SIZE - num_dropped
    );

    Ok((on_spike_trains, off_spike_trains))
}

/// Encodes ON and OFF spike trains (ms) into an AER file stamped with the
/// current local time. See [`encode_at`].
pub fn encode(
    on_spike_trains: &[Vec<f64>],
    off_spike_trains: &[Vec<f64>],
    image_size: u32,
    addr_scale: u32,
) -> SimpleResult<EncodeOutcome> {
    encode_at(
        on_spike_trains,
        off_spike_trains,
        image_size,
        addr_scale,
        Local::now().naive_local(),
    )
}

/// Encodes ON and OFF spike trains (ms) into an AER file.
///
/// A polarity only contributes if it has exactly `image_size * image_size`
/// trains. All events are sorted by time with ties keeping ON before OFF,
/// and timestamps are rounded up to whole microseconds.
pub fn encode_at(
    on_spike_trains: &[Vec<f64>],
    off_spike_trains: &[Vec<f64>],
    image_size: u32,
    addr_scale: u32,
    created: NaiveDateTime,
) -> SimpleResult<EncodeOutcome> {
    try_with!(
        params::validate_aer_params(&params::AerParams {
            image_size,
            addr_scale
        }),
        "invalid AER parameters"
    );

    let num_neurons = image_size as usize * image_size as usize;
    let mut timed_events: Vec<(f64, usize, Polarity)> = Vec::new();

    for (spike_trains, polarity) in [
        (on_spike_trains, Polarity::On),
        (off_spike_trains, Polarity::Off),
    ] {
        if spike_trains.len() != num_neurons {
            warn!(
                "skipping {:?} events: got {} spike trains, expected {}",
                polarity,
                spike_trains.len(),
                num_neurons
            );
            continue;
        }

        for (neuron_id, spike_train) in spike_trains.iter().enumerate() {
            timed_events.extend(spike_train.iter().map(|t| (*t, neuron_id, polarity)));
        }
    }

    let mut bytes = header_bytes(created);

    if timed_events.is_empty() {
        return Ok(EncodeOutcome::NoEvents(bytes));
    }

    // stable, so ON events stay ahead of OFF events at equal times
    timed_events.sort_by(|a, b| a.0.total_cmp(&b.0));

    let events = timed_events
        .into_iter()
        .map(|(t, neuron_id, polarity)| {
            Ok(AerEvent {
                timestamp_us: ms_to_us(t)?,
                neuron_id,
                polarity,
            })
        })
        .collect::<SimpleResult<Vec<_>>>()?;

    bytes.reserve(events.len() * EVENT_SIZE);

    for event in &events {
        let x = event.neuron_id as u32 % image_size;
        let y = event.neuron_id as u32 / image_size;
        let address = pack_address(x, y, event.polarity, addr_scale);

        try_with!(
            bytes.write_u32::<BigEndian>(address),
            "failed to write AER address"
        );
        try_with!(
            bytes.write_u32::<BigEndian>(event.timestamp_us),
            "failed to write AER timestamp"
        );
    }

    debug!("encoded {} AER events", events.len());

    Ok(EncodeOutcome::Encoded(AerRecording { events, bytes }))
}

pub fn header_bytes(created: NaiveDateTime) -> Vec<u8> {
    let mut header = Vec::new();
    // writing into a Vec cannot fail
    let _ = write!(
        header,
        "{}{:.1}\r\n\
         # This is a raw AE data file - do not edit\r\n\
         # Data format is int32 address, int32 timestamp (8 bytes total), repeated for each event\r\n\
         # Timestamps tick is 1 us\r\n\
         # Created {}\r\n",
        FORMAT_TAG,
        FORMAT_VERSION,
        created.format("%Y-%m-%d %H:%M:%S%.6f")
    );
    header
}

fn header_len(bytes: &[u8]) -> SimpleResult<usize> {
    bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'\n')
        .nth(NUM_HEADER_LINES - 1)
        .map(|(idx, _)| idx + 1)
        .ok_or_else(|| {
            SimpleError::new(format!(
                "malformed AER header: expected {} header lines",
                NUM_HEADER_LINES
            ))
        })
}

fn ms_to_us(t: f64) -> SimpleResult<u32> {
    if !t.is_finite() || t < 0.0 {
        return Err(SimpleError::new(format!(
            "spike time {} ms is negative or not finite",
            t
        )));
    }

    let t_us = (t * 1000.0).ceil();

    if t_us > u32::MAX as f64 {
        return Err(SimpleError::new(format!(
            "timestamp {} ms does not fit into 32 bit microseconds",
            t
        )));
    }

    Ok(t_us as u32)
}
