//! Attitude line forwarded to downstream consumers.

use crate::frame::protocol::{round3, DecodedRecord};

/// Last known attitude, held by the caller across frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
}

impl From<&DecodedRecord> for Attitude {
    fn from(record: &DecodedRecord) -> Self {
        Self {
            roll: record.roll,
            pitch: record.pitch,
        }
    }
}

impl Attitude {
    /// `"{roll}, {pitch}"` with both values rounded to 3 decimals
    ///
    /// Whole numbers keep their `.0`: `"45.0, 0.0"`.
    pub fn line(&self) -> String {
        format!("{:?}, {:?}", round3(self.roll), round3(self.pitch))
    }
}

/// Format the forwarded attitude message for a record
pub fn attitude_line(record: &DecodedRecord) -> String {
    Attitude::from(record).line()
}
