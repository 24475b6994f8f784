//! # Serial Communication Module
//!
//! Handles the serial links around the frame codec.
//!
//! This module handles:
//! - Opening the sensor, forwarding and generator ports with their line settings
//! - Turning an input port into a [`FrameStream`]
//! - Writing frames and attitude lines with write-then-flush semantics

pub mod sink;

use std::time::Duration;

use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info};

use crate::config::{GeneratorConfig, InputConfig, OutputConfig, Parity};
use crate::error::{InsLinkError, Result};
use crate::frame::stream::FrameStream;
use sink::{AsyncWriteSink, LinkSink};

/// Line settings for one serial link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub port: String,
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: u8,
    pub timeout: Duration,
}

impl From<&InputConfig> for LinkSettings {
    fn from(config: &InputConfig) -> Self {
        Self {
            port: config.port.clone(),
            baud_rate: config.baud_rate,
            parity: config.parity,
            stop_bits: config.stop_bits,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl From<&OutputConfig> for LinkSettings {
    fn from(config: &OutputConfig) -> Self {
        Self {
            port: config.port.clone(),
            baud_rate: config.baud_rate,
            parity: config.parity,
            stop_bits: config.stop_bits,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl From<&GeneratorConfig> for LinkSettings {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            port: config.port.clone(),
            baud_rate: config.baud_rate,
            parity: config.parity,
            stop_bits: config.stop_bits,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

fn to_serial_parity(parity: Parity) -> tokio_serial::Parity {
    match parity {
        Parity::None => tokio_serial::Parity::None,
        Parity::Odd => tokio_serial::Parity::Odd,
        Parity::Even => tokio_serial::Parity::Even,
    }
}

fn to_serial_stop_bits(stop_bits: u8) -> tokio_serial::StopBits {
    match stop_bits {
        2 => tokio_serial::StopBits::Two,
        _ => tokio_serial::StopBits::One,
    }
}

/// Open a serial port with the given line settings (8 data bits, no flow control)
///
/// # Errors
///
/// Returns `InsLinkError::Serial` if the port cannot be opened
pub fn open_port(settings: &LinkSettings) -> Result<SerialStream> {
    debug!("Opening serial port {} at {} baud", settings.port, settings.baud_rate);

    let port = tokio_serial::new(&settings.port, settings.baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(to_serial_parity(settings.parity))
        .stop_bits(to_serial_stop_bits(settings.stop_bits))
        .flow_control(tokio_serial::FlowControl::None)
        .timeout(settings.timeout)
        .open_native_async()
        .map_err(|e| InsLinkError::Serial(format!("Failed to open {}: {}", settings.port, e)))?;

    info!(
        "Opened {} ({} baud, parity {:?}, {} stop bit(s))",
        settings.port, settings.baud_rate, settings.parity, settings.stop_bits
    );
    Ok(port)
}

/// Open the sensor link as a frame stream
pub fn open_frame_stream(settings: &LinkSettings) -> Result<FrameStream<SerialStream>> {
    let port = open_port(settings)?;
    Ok(FrameStream::new(port, settings.timeout))
}

/// Open an output link for writing
pub fn open_writer(settings: &LinkSettings) -> Result<LinkWriter<AsyncWriteSink<SerialStream>>> {
    let port = open_port(settings)?;
    Ok(LinkWriter::new(AsyncWriteSink::new(port), settings.port.clone()))
}

/// Message writer over one outgoing link
pub struct LinkWriter<S> {
    sink: S,
    device_path: String,
    bytes_sent: u64,
}

impl<S> std::fmt::Debug for LinkWriter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkWriter")
            .field("device_path", &self.device_path)
            .field("bytes_sent", &self.bytes_sent)
            .finish_non_exhaustive()
    }
}

impl<S: LinkSink> LinkWriter<S> {
    pub fn new(sink: S, device_path: String) -> Self {
        Self {
            sink,
            device_path,
            bytes_sent: 0,
        }
    }

    /// Write and flush one message
    ///
    /// # Errors
    ///
    /// Returns `InsLinkError::Serial` if the write or flush fails
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sink.write_all(data).await
            .map_err(|e| InsLinkError::Serial(format!("Failed to write to {}: {}", self.device_path, e)))?;

        self.sink.flush().await
            .map_err(|e| InsLinkError::Serial(format!("Failed to flush {}: {}", self.device_path, e)))?;

        self.bytes_sent += data.len() as u64;
        debug!("Sent {} bytes to {}", data.len(), self.device_path);
        Ok(())
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}
