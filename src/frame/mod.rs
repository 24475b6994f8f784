//! # Telemetry Frame Module
//!
//! Codec for the 32-byte attitude/INS telemetry frame.
//!
//! This module handles:
//! - Frame layout constants and scale factors
//! - Frame decoding with structural and checksum validation
//! - Frame encoding from records and random mock data generation
//! - Additive checksum calculation
//! - Stream synchronization and resynchronization

pub mod protocol;
pub mod encoder;
pub mod decoder;
pub mod checksum;
pub mod sync;
pub mod stream;
