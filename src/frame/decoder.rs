//! # Frame Decoder
//!
//! Validates a 32-byte window and converts it into physical units.
//!
//! The decoder is a pure function of its input. It does not trust the caller's
//! framing and re-checks, in order: length, sync header, terminator, checksum.

use super::checksum::checksum;
use super::protocol::*;
use crate::error::FrameError;

/// Decode a complete frame into a [`DecodedRecord`]
///
/// # Arguments
///
/// * `frame` - Exactly one frame (sync header through terminator)
///
/// # Errors
///
/// Returns, in order of checking:
/// - `TruncatedFrame` if the input is not exactly 32 bytes
/// - `SyncMismatch` if bytes 0-1 are not `5A A5`
/// - `TerminatorMismatch` if byte 31 is not `AA`
/// - `ChecksumMismatch` if byte 30 is not the sum of bytes 0-29
///
/// # Examples
///
/// ```
/// use ins_link::frame::decoder::decode_frame;
/// use ins_link::frame::encoder::encode_raw;
/// use ins_link::frame::protocol::RawTelemetry;
///
/// let frame = encode_raw(&RawTelemetry { roll: 16384, ..Default::default() });
/// let record = decode_frame(&frame)?;
/// assert_eq!(record.roll, 45.0);
/// # Ok::<(), ins_link::error::FrameError>(())
/// ```
pub fn decode_frame(frame: &[u8]) -> Result<DecodedRecord, FrameError> {
    decode_raw(frame).map(|raw| raw.to_record())
}

/// Validate a frame and return its raw integer fields
pub fn decode_raw(frame: &[u8]) -> Result<RawTelemetry, FrameError> {
    validate_frame(frame)?;

    Ok(RawTelemetry {
        status_1: frame[STATUS_1_OFFSET],
        status_2: frame[STATUS_2_OFFSET],
        heading: read_u16(frame, 0),
        roll: read_i16(frame, 1),
        pitch: read_i16(frame, 2),
        heading_rate: read_u16(frame, 3),
        roll_rate: read_i16(frame, 4),
        pitch_rate: read_i16(frame, 5),
        velocity_north: read_i16(frame, 6),
        velocity_east: read_i16(frame, 7),
        velocity_down: read_i16(frame, 8),
        accel_north: read_i16(frame, 9),
        accel_east: read_i16(frame, 10),
        accel_down: read_i16(frame, 11),
    })
}

/// Run the structural and checksum checks without extracting fields
pub fn validate_frame(frame: &[u8]) -> Result<(), FrameError> {
    if frame.len() != FRAME_LEN {
        return Err(FrameError::TruncatedFrame { len: frame.len() });
    }

    if frame[..2] != SYNC_HEADER {
        return Err(FrameError::SyncMismatch { found: [frame[0], frame[1]] });
    }

    if frame[TERMINATOR_OFFSET] != TERMINATOR {
        return Err(FrameError::TerminatorMismatch { found: frame[TERMINATOR_OFFSET] });
    }

    let expected = checksum(&frame[..CHECKSUM_OFFSET]);
    let found = frame[CHECKSUM_OFFSET];
    if expected != found {
        return Err(FrameError::ChecksumMismatch { expected, found });
    }

    Ok(())
}

/// Read the `index`-th 16-bit field (big-endian, unsigned)
fn read_u16(frame: &[u8], index: usize) -> u16 {
    let offset = FIELDS_OFFSET + index * 2;
    u16::from_be_bytes([frame[offset], frame[offset + 1]])
}

/// Read the `index`-th 16-bit field (big-endian, two's-complement)
fn read_i16(frame: &[u8], index: usize) -> i16 {
    let offset = FIELDS_OFFSET + index * 2;
    i16::from_be_bytes([frame[offset], frame[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::encoder::{encode_raw, generate_frame};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hand-assembled frame: heading 0x7FFF, roll -32768, everything else zero
    fn boundary_frame() -> Vec<u8> {
        let mut frame = vec![0x5A, 0xA5, 0x1A, 0x01, 0x03, 0x04];
        frame.extend_from_slice(&[0x7F, 0xFF]); // heading
        frame.extend_from_slice(&[0x80, 0x00]); // roll
        frame.extend_from_slice(&[0x00; 20]);
        let sum = frame.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        frame.push(sum);
        frame.push(0xAA);
        frame
    }

    #[test]
    fn test_decode_hand_assembled_frame() {
        let frame = boundary_frame();
        assert_eq!(frame.len(), FRAME_LEN);

        let record = decode_frame(&frame).unwrap();
        assert!(record.valid);
        assert_eq!(record.status_1, 3);
        assert_eq!(record.status_2, 4);
        assert!((record.heading - 359.989).abs() < 0.001);
        assert_eq!(record.roll, -90.0);
        assert_eq!(record.pitch, 0.0);
        assert_eq!(record.accel_down, 0.0);
    }

    #[test]
    fn test_decode_raw_fields() {
        let raw = RawTelemetry {
            status_1: 0x11,
            status_2: 0x22,
            heading: 0xFFFF,
            roll: -1,
            pitch: 1,
            heading_rate: 0x8000,
            roll_rate: i16::MIN,
            pitch_rate: i16::MAX,
            velocity_north: 500,
            velocity_east: -500,
            velocity_down: 0,
            accel_north: 981,
            accel_east: -981,
            accel_down: 12,
        };
        let frame = encode_raw(&raw);

        assert_eq!(decode_raw(&frame).unwrap(), raw);

        let record = decode_frame(&frame).unwrap();
        assert!((record.velocity_north - 1.0).abs() < 1e-12);
        assert!((record.velocity_east + 1.0).abs() < 1e-12);
        assert!((record.accel_north - 9.81).abs() < 1e-12);
        assert_eq!(record.heading_rate, 1.0);
        assert_eq!(record.roll_rate, -1.0);
    }

    #[test]
    fn test_decode_too_short() {
        let frame = boundary_frame();
        assert_eq!(decode_frame(&frame[..31]), Err(FrameError::TruncatedFrame { len: 31 }));
        assert_eq!(decode_frame(&[]), Err(FrameError::TruncatedFrame { len: 0 }));
    }

    #[test]
    fn test_decode_too_long() {
        let mut frame = boundary_frame();
        frame.push(0x00);
        assert_eq!(decode_frame(&frame), Err(FrameError::TruncatedFrame { len: 33 }));
    }

    #[test]
    fn test_decode_invalid_sync() {
        let mut frame = boundary_frame();
        frame[0] = 0x00;
        frame[1] = 0x00;
        assert_eq!(decode_frame(&frame), Err(FrameError::SyncMismatch { found: [0x00, 0x00] }));
    }

    #[test]
    fn test_decode_invalid_terminator() {
        let mut frame = boundary_frame();
        frame[31] = 0x00;
        assert_eq!(decode_frame(&frame), Err(FrameError::TerminatorMismatch { found: 0x00 }));
    }

    #[test]
    fn test_decode_checksum_error() {
        let mut frame = boundary_frame();
        let good = frame[30];
        frame[30] = good.wrapping_add(1);
        assert_eq!(
            decode_frame(&frame),
            Err(FrameError::ChecksumMismatch { expected: good, found: good.wrapping_add(1) })
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        // Bad header and bad terminator: header is reported first
        let mut frame = boundary_frame();
        frame[0] = 0x00;
        frame[31] = 0x00;
        assert!(matches!(decode_frame(&frame), Err(FrameError::SyncMismatch { .. })));

        // Bad terminator and bad checksum: terminator is reported first
        let mut frame = boundary_frame();
        frame[30] ^= 0xFF;
        frame[31] = 0x00;
        assert!(matches!(decode_frame(&frame), Err(FrameError::TerminatorMismatch { .. })));
    }

    #[test]
    fn test_single_byte_mutation_fails_checksum() {
        let mut rng = StdRng::seed_from_u64(7);
        let frame = generate_frame(&mut rng);

        // Bytes 0-1 are the header and fail earlier with SyncMismatch
        for index in 2..CHECKSUM_OFFSET {
            let mut corrupted = frame;
            corrupted[index] = corrupted[index].wrapping_add(0x5B);
            assert!(
                matches!(decode_frame(&corrupted), Err(FrameError::ChecksumMismatch { .. })),
                "mutation at byte {} was not detected",
                index
            );
        }
    }

    #[test]
    fn test_decode_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let frame = generate_frame(&mut rng);
        assert_eq!(decode_frame(&frame), decode_frame(&frame));
    }
}
