//! # Telemetry Module
//!
//! Handles what happens to decoded frames after the codec.
//!
//! This module handles:
//! - Formatting as JSONL (JSON Lines)
//! - Writing to rotating log files (max N records per file, last M files kept)
//! - Formatting the roll/pitch line forwarded to a second serial link

pub mod attitude;
pub mod logger;
