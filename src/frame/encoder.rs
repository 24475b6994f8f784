//! # Frame Encoder
//!
//! Builds wire frames from raw values, from decoded records, or from random
//! field values for mock data generation.

use rand::Rng;

use super::checksum::checksum;
use super::protocol::*;

/// Raw roll/pitch bound used by the generator: `90 * floor((2^15 - 1) / 90)`
///
/// Maps back to just under ±90°.
pub const ATTITUDE_RAW_LIMIT: i16 = 90 * ((i16::MAX as i32 / 90) as i16);

/// Encode raw telemetry into a complete frame
///
/// # Arguments
///
/// * `raw` - Status bytes and the twelve raw 16-bit fields
///
/// # Returns
///
/// * `[u8; 32]` - Header, length, identifier, status, fields, checksum, terminator
///
/// # Examples
///
/// ```
/// use ins_link::frame::encoder::encode_raw;
/// use ins_link::frame::protocol::RawTelemetry;
///
/// let frame = encode_raw(&RawTelemetry::default());
/// assert_eq!(&frame[..4], &[0x5A, 0xA5, 0x1A, 0x01]);
/// assert_eq!(frame[31], 0xAA);
/// ```
pub fn encode_raw(raw: &RawTelemetry) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];

    frame[..2].copy_from_slice(&SYNC_HEADER);
    frame[2] = PAYLOAD_LEN;
    frame[3] = FRAME_ID;
    frame[STATUS_1_OFFSET] = raw.status_1;
    frame[STATUS_2_OFFSET] = raw.status_2;

    for (index, word) in raw.words().iter().enumerate() {
        let offset = FIELDS_OFFSET + index * 2;
        frame[offset..offset + 2].copy_from_slice(&word.to_be_bytes());
    }

    frame[CHECKSUM_OFFSET] = checksum(&frame[..CHECKSUM_OFFSET]);
    frame[TERMINATOR_OFFSET] = TERMINATOR;

    frame
}

/// Encode a physical-unit record into a complete frame
///
/// Inverse of [`decode_frame`](super::decoder::decode_frame): every value is
/// quantized to the nearest LSB of its field, so decoding the result differs
/// from the input by at most half a scale step.
pub fn encode_record(record: &DecodedRecord) -> [u8; FRAME_LEN] {
    encode_raw(&RawTelemetry::from_record(record))
}

/// Sample random raw telemetry within each field's valid range
///
/// Heading covers the full unsigned range (0-360°), roll and pitch stay
/// within ±[`ATTITUDE_RAW_LIMIT`], all other fields cover the full signed range.
pub fn random_telemetry<R: Rng>(rng: &mut R) -> RawTelemetry {
    RawTelemetry {
        status_1: rng.gen(),
        status_2: rng.gen(),
        heading: rng.gen(),
        roll: rng.gen_range(-ATTITUDE_RAW_LIMIT..=ATTITUDE_RAW_LIMIT),
        pitch: rng.gen_range(-ATTITUDE_RAW_LIMIT..=ATTITUDE_RAW_LIMIT),
        heading_rate: rng.gen(),
        roll_rate: rng.gen(),
        pitch_rate: rng.gen(),
        velocity_north: rng.gen(),
        velocity_east: rng.gen(),
        velocity_down: rng.gen(),
        accel_north: rng.gen(),
        accel_east: rng.gen(),
        accel_down: rng.gen(),
    }
}

/// Generate a random mock frame
///
/// # Examples
///
/// ```
/// use ins_link::frame::decoder::decode_frame;
/// use ins_link::frame::encoder::generate_frame;
///
/// let frame = generate_frame(&mut rand::thread_rng());
/// assert!(decode_frame(&frame).is_ok());
/// ```
pub fn generate_frame<R: Rng>(rng: &mut R) -> [u8; FRAME_LEN] {
    encode_raw(&random_telemetry(rng))
}
