//! # INS Link Library
//!
//! Decode and generate 32-byte attitude/INS telemetry frames.
//!
//! This library provides the frame codec (layout, decoder, encoder, checksum),
//! a stream synchronizer that recovers framing from a raw byte stream, and the
//! serial, telemetry and configuration plumbing used by the `ins-link` binary.

pub mod config;
pub mod error;
pub mod frame;
pub mod generator;
pub mod logging;
pub mod monitor;
pub mod serial;
pub mod telemetry;
