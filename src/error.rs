//! # Error Types
//!
//! Custom error types for INS Link using `thiserror`.

use thiserror::Error;

/// Frame validation failures reported by the decoder.
///
/// Every variant is recoverable: the stream synchronizer treats any of them as
/// a signal to resynchronize rather than abort.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Input is not exactly one frame long
    #[error("truncated frame: expected 32 bytes, got {len}")]
    TruncatedFrame { len: usize },

    /// Sync header bytes absent
    #[error("sync header mismatch: found {found:02X?}")]
    SyncMismatch { found: [u8; 2] },

    /// Terminator byte absent
    #[error("terminator mismatch: found 0x{found:02X}")]
    TerminatorMismatch { found: u8 },

    /// Additive checksum disagrees
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{found:02X}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

impl FrameError {
    /// Short, stable name of the failure kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::TruncatedFrame { .. } => "truncated_frame",
            FrameError::SyncMismatch { .. } => "sync_mismatch",
            FrameError::TerminatorMismatch { .. } => "terminator_mismatch",
            FrameError::ChecksumMismatch { .. } => "checksum_mismatch",
        }
    }
}

/// Main error type for INS Link
#[derive(Debug, Error)]
pub enum InsLinkError {
    /// Frame decoding errors
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// Telemetry serialization errors
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for INS Link
pub type Result<T> = std::result::Result<T, InsLinkError>;
