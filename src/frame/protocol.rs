//! # Frame Layout Constants and Types
//!
//! Core definitions for the 32-byte attitude/INS telemetry frame.
//!
//! | Offset | Field | Encoding |
//! |--------|-------|----------|
//! | 0-1 | Sync header | `0x5A 0xA5` |
//! | 2 | Payload length | `0x1A` |
//! | 3 | Identifier | `0x01` |
//! | 4, 5 | Status 1, Status 2 | raw bytes |
//! | 6-29 | Twelve telemetry fields | big-endian 16-bit |
//! | 30 | Checksum | sum of bytes 0-29 mod 256 |
//! | 31 | Terminator | `0xAA` |

use std::fmt;

use serde::Serialize;

/// Total frame length in bytes
pub const FRAME_LEN: usize = 32;

/// Sync header marking the start of every frame
pub const SYNC_HEADER: [u8; 2] = [0x5A, 0xA5];

/// Payload length byte (fixed in this protocol version)
pub const PAYLOAD_LEN: u8 = 0x1A;

/// Frame identifier byte
pub const FRAME_ID: u8 = 0x01;

/// Terminator byte
pub const TERMINATOR: u8 = 0xAA;

/// Offset of the checksum byte; the checksum covers every byte before it
pub const CHECKSUM_OFFSET: usize = 30;

/// Offset of the terminator byte
pub const TERMINATOR_OFFSET: usize = 31;

/// Offset of Status 1
pub const STATUS_1_OFFSET: usize = 4;

/// Offset of Status 2
pub const STATUS_2_OFFSET: usize = 5;

/// Offset of the first 16-bit telemetry field (heading)
pub const FIELDS_OFFSET: usize = 6;

/// Heading scale: 180 / 2^15 degrees per LSB (0-360°)
pub const HEADING_SCALE: f64 = 180.0 / 32768.0;

/// Roll and pitch scale: 90 / 2^15 degrees per LSB (±90°)
pub const ANGLE_SCALE: f64 = 90.0 / 32768.0;

/// Attitude rate scale: 1 / 2^15 per LSB
pub const RATE_SCALE: f64 = 1.0 / 32768.0;

/// Velocity scale: 0.002 m/s per LSB
pub const VELOCITY_SCALE: f64 = 0.002;

/// Linear acceleration scale: 0.01 per LSB
pub const ACCEL_SCALE: f64 = 0.01;

/// Raw telemetry values exactly as they appear on the wire.
///
/// Heading and heading rate are unsigned; every other field is two's-complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTelemetry {
    pub status_1: u8,
    pub status_2: u8,
    pub heading: u16,
    pub roll: i16,
    pub pitch: i16,
    pub heading_rate: u16,
    pub roll_rate: i16,
    pub pitch_rate: i16,
    pub velocity_north: i16,
    pub velocity_east: i16,
    pub velocity_down: i16,
    pub accel_north: i16,
    pub accel_east: i16,
    pub accel_down: i16,
}

/// Decoded telemetry in physical units.
///
/// Values keep full `f64` precision; use [`DecodedRecord::rounded`] or the
/// `Display` impl when presenting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedRecord {
    pub status_1: u8,
    pub status_2: u8,

    /// Attitude heading in degrees
    pub heading: f64,

    /// Attitude roll in degrees
    pub roll: f64,

    /// Attitude pitch in degrees
    pub pitch: f64,

    pub heading_rate: f64,
    pub roll_rate: f64,
    pub pitch_rate: f64,

    /// INS velocities in m/s
    pub velocity_north: f64,
    pub velocity_east: f64,
    pub velocity_down: f64,

    pub accel_north: f64,
    pub accel_east: f64,
    pub accel_down: f64,

    /// Set when the record came from a frame that passed validation
    pub valid: bool,
}

impl RawTelemetry {
    /// Scale every field into physical units.
    pub fn to_record(&self) -> DecodedRecord {
        DecodedRecord {
            status_1: self.status_1,
            status_2: self.status_2,
            heading: self.heading as f64 * HEADING_SCALE,
            roll: self.roll as f64 * ANGLE_SCALE,
            pitch: self.pitch as f64 * ANGLE_SCALE,
            heading_rate: self.heading_rate as f64 * RATE_SCALE,
            roll_rate: self.roll_rate as f64 * RATE_SCALE,
            pitch_rate: self.pitch_rate as f64 * RATE_SCALE,
            velocity_north: self.velocity_north as f64 * VELOCITY_SCALE,
            velocity_east: self.velocity_east as f64 * VELOCITY_SCALE,
            velocity_down: self.velocity_down as f64 * VELOCITY_SCALE,
            accel_north: self.accel_north as f64 * ACCEL_SCALE,
            accel_east: self.accel_east as f64 * ACCEL_SCALE,
            accel_down: self.accel_down as f64 * ACCEL_SCALE,
            valid: true,
        }
    }

    /// Quantize a physical-unit record back into raw wire values.
    ///
    /// Values are rounded to the nearest LSB and saturate at the field's
    /// integer range, except heading, which wraps modulo 360°. Non-finite
    /// values quantize to zero.
    pub fn from_record(record: &DecodedRecord) -> Self {
        Self {
            status_1: record.status_1,
            status_2: record.status_2,
            heading: quantize_heading(record.heading),
            roll: quantize_signed(record.roll, ANGLE_SCALE),
            pitch: quantize_signed(record.pitch, ANGLE_SCALE),
            heading_rate: quantize_unsigned(record.heading_rate, RATE_SCALE),
            roll_rate: quantize_signed(record.roll_rate, RATE_SCALE),
            pitch_rate: quantize_signed(record.pitch_rate, RATE_SCALE),
            velocity_north: quantize_signed(record.velocity_north, VELOCITY_SCALE),
            velocity_east: quantize_signed(record.velocity_east, VELOCITY_SCALE),
            velocity_down: quantize_signed(record.velocity_down, VELOCITY_SCALE),
            accel_north: quantize_signed(record.accel_north, ACCEL_SCALE),
            accel_east: quantize_signed(record.accel_east, ACCEL_SCALE),
            accel_down: quantize_signed(record.accel_down, ACCEL_SCALE),
        }
    }

    /// The twelve 16-bit fields in wire order, as raw big-endian words.
    pub fn words(&self) -> [u16; 12] {
        [
            self.heading,
            self.roll as u16,
            self.pitch as u16,
            self.heading_rate,
            self.roll_rate as u16,
            self.pitch_rate as u16,
            self.velocity_north as u16,
            self.velocity_east as u16,
            self.velocity_down as u16,
            self.accel_north as u16,
            self.accel_east as u16,
            self.accel_down as u16,
        ]
    }
}

// Heading is circular: wrap into [0, 360) and let the top half step roll over to 0
fn quantize_heading(degrees: f64) -> u16 {
    let steps = (degrees.rem_euclid(360.0) / HEADING_SCALE).round() as u32;
    (steps % 0x1_0000) as u16
}

// `as` saturates on float-to-int casts and maps NaN to 0
fn quantize_unsigned(value: f64, scale: f64) -> u16 {
    (value / scale).round() as u16
}

fn quantize_signed(value: f64, scale: f64) -> i16 {
    (value / scale).round() as i16
}

/// Round a value to 3 decimal digits for presentation.
///
/// Exact ties go to the even digit, matching `{:.3}` formatting.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

impl DecodedRecord {
    /// Copy of this record with every physical value rounded to 3 decimals.
    pub fn rounded(&self) -> Self {
        Self {
            heading: round3(self.heading),
            roll: round3(self.roll),
            pitch: round3(self.pitch),
            heading_rate: round3(self.heading_rate),
            roll_rate: round3(self.roll_rate),
            pitch_rate: round3(self.pitch_rate),
            velocity_north: round3(self.velocity_north),
            velocity_east: round3(self.velocity_east),
            velocity_down: round3(self.velocity_down),
            accel_north: round3(self.accel_north),
            accel_east: round3(self.accel_east),
            accel_down: round3(self.accel_down),
            ..*self
        }
    }

    /// Labelled physical fields in wire order.
    pub fn fields(&self) -> [(&'static str, f64); 12] {
        [
            ("Attitude Heading (°)", self.heading),
            ("Attitude Roll (°)", self.roll),
            ("Attitude Pitch (°)", self.pitch),
            ("Attitude Heading rate", self.heading_rate),
            ("Attitude Roll rate", self.roll_rate),
            ("Attitude Pitch rate", self.pitch_rate),
            ("INS North Velocity (m/s)", self.velocity_north),
            ("INS East Velocity (m/s)", self.velocity_east),
            ("INS Down Velocity (m/s)", self.velocity_down),
            ("Linear Acceleration North", self.accel_north),
            ("Linear Acceleration East", self.accel_east),
            ("Linear Acceleration Down", self.accel_down),
        ]
    }
}

impl fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status 1 : {}", self.status_1)?;
        write!(f, "Status 2 : {}", self.status_2)?;
        for (label, value) in self.fields() {
            write!(f, "\n{} : {:.3}", label, value)?;
        }
        Ok(())
    }
}

/// Render bytes as space-separated uppercase hex (`5A A5 1A ...`).
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_constants() {
        assert_eq!(FRAME_LEN, 32);
        assert_eq!(SYNC_HEADER, [0x5A, 0xA5]);
        assert_eq!(PAYLOAD_LEN, 26);
        assert_eq!(FRAME_ID, 0x01);
        assert_eq!(TERMINATOR, 0xAA);
        assert_eq!(CHECKSUM_OFFSET, FRAME_LEN - 2);
        assert_eq!(TERMINATOR_OFFSET, FRAME_LEN - 1);
        // Twelve 16-bit fields fill the gap between status bytes and checksum
        assert_eq!(FIELDS_OFFSET + 12 * 2, CHECKSUM_OFFSET);
    }

    #[test]
    fn test_heading_scale_boundary() {
        let raw = RawTelemetry { heading: 0x7FFF, ..Default::default() };
        let record = raw.to_record();
        assert!((record.heading - 359.989).abs() < 0.001);
        assert_eq!(record.heading, 32767.0 * 180.0 / 32768.0);
    }

    #[test]
    fn test_roll_scale_boundary() {
        let raw = RawTelemetry { roll: i16::MIN, pitch: i16::MIN, ..Default::default() };
        let record = raw.to_record();
        assert_eq!(record.roll, -90.0);
        assert_eq!(record.pitch, -90.0);
    }

    #[test]
    fn test_to_record_is_valid() {
        assert!(RawTelemetry::default().to_record().valid);
    }

    #[test]
    fn test_from_record_saturates() {
        let mut record = RawTelemetry::default().to_record();
        record.roll = 1000.0;
        record.pitch = -1000.0;
        record.heading_rate = -5.0;
        record.accel_down = f64::NAN;

        let raw = RawTelemetry::from_record(&record);
        assert_eq!(raw.roll, i16::MAX);
        assert_eq!(raw.pitch, i16::MIN);
        assert_eq!(raw.heading_rate, 0);
        assert_eq!(raw.accel_down, 0);
    }

    #[test]
    fn test_from_record_wraps_heading() {
        let mut record = RawTelemetry::default().to_record();

        record.heading = 359.999;
        assert_eq!(RawTelemetry::from_record(&record).heading, 0);

        record.heading = 359.994;
        assert_eq!(RawTelemetry::from_record(&record).heading, u16::MAX);

        record.heading = 360.0 + 90.0;
        assert_eq!(RawTelemetry::from_record(&record).heading, 0x4000);

        record.heading = -90.0;
        assert_eq!(RawTelemetry::from_record(&record).heading, 0xC000);

        record.heading = f64::NAN;
        assert_eq!(RawTelemetry::from_record(&record).heading, 0);
    }

    #[test]
    fn test_from_record_rounds_to_nearest() {
        let mut record = RawTelemetry::default().to_record();
        record.velocity_north = 0.0032; // 1.6 LSB
        record.velocity_east = -0.0028; // -1.4 LSB

        let raw = RawTelemetry::from_record(&record);
        assert_eq!(raw.velocity_north, 2);
        assert_eq!(raw.velocity_east, -1);
    }

    #[test]
    fn test_words_preserve_twos_complement() {
        let raw = RawTelemetry { roll: -1, accel_down: i16::MIN, ..Default::default() };
        let words = raw.words();
        assert_eq!(words[1], 0xFFFF);
        assert_eq!(words[11], 0x8000);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(359.98901), 359.989);
        assert_eq!(round3(-0.0004), -0.0);
        assert_eq!(round3(1.2346), 1.235);
    }

    #[test]
    fn test_round3_matches_display_on_ties() {
        // Raw roll 1024 is exactly 2.8125°
        let record = RawTelemetry { roll: 1024, pitch: -1024, ..Default::default() }.to_record();
        assert_eq!(record.roll, 2.8125);
        assert_eq!(round3(record.roll), 2.812);
        assert_eq!(round3(record.pitch), -2.812);
        assert!(record.to_string().contains("Attitude Roll (°) : 2.812"));
        assert_eq!(record.rounded().roll, 2.812);
    }

    #[test]
    fn test_rounded_keeps_status_and_validity() {
        let raw = RawTelemetry { status_1: 7, status_2: 200, heading: 12345, ..Default::default() };
        let rounded = raw.to_record().rounded();
        assert_eq!(rounded.status_1, 7);
        assert_eq!(rounded.status_2, 200);
        assert!(rounded.valid);
        assert_eq!(rounded.heading, 67.813);
    }

    #[test]
    fn test_display_lists_every_field() {
        let text = RawTelemetry { roll: 16384, ..Default::default() }.to_record().to_string();
        assert_eq!(text.lines().count(), 14);
        assert!(text.contains("Attitude Roll (°) : 45.000"));
        assert!(text.starts_with("Status 1 : 0"));
    }

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[0x5A, 0xA5, 0x01, 0x0F]), "5A A5 01 0F");
        assert_eq!(hex_dump(&[]), "");
    }
}
