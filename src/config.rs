//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::error::{InsLinkError, Result};

/// Serial baud rates accepted for the sensor and forwarding links
pub const SUPPORTED_BAUD_RATES: &[u32] = &[9600, 19200, 38400, 57600, 115200];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub generator: GeneratorConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

/// Serial parity setting
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Sensor input link
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_input_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_input_parity")]
    pub parity: Parity,

    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Attitude forwarding link
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_output_parity")]
    pub parity: Parity,

    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Mock frame generator link
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_input_parity")]
    pub parity: Parity,

    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
}

/// Telemetry recorder configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Diagnostic logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Mirror logs into daily rolling files in this directory
    #[serde(default)]
    pub file_dir: Option<String>,
}

// Default value functions
fn default_input_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_generator_port() -> String { "/dev/ttyUSB1".to_string() }
fn default_baud_rate() -> u32 { 38400 }
fn default_input_parity() -> Parity { Parity::Even }
fn default_output_parity() -> Parity { Parity::None }
fn default_stop_bits() -> u8 { 1 }
fn default_timeout_ms() -> u64 { 1000 }
fn default_rate_hz() -> u32 { 1 }

fn default_telemetry_enabled() -> bool { false }
fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }
fn default_log_format() -> String { "jsonl".to_string() }

fn default_log_level() -> String { "info".to_string() }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            port: default_input_port(),
            baud_rate: default_baud_rate(),
            parity: default_input_parity(),
            stop_bits: default_stop_bits(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: String::new(),
            baud_rate: default_baud_rate(),
            parity: default_output_parity(),
            stop_bits: default_stop_bits(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            port: default_generator_port(),
            baud_rate: default_baud_rate(),
            parity: default_input_parity(),
            stop_bits: default_stop_bits(),
            timeout_ms: default_timeout_ms(),
            rate_hz: default_rate_hz(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_telemetry_enabled(),
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
            format: default_log_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_dir: None,
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> InsLinkError {
    InsLinkError::Config(toml::de::Error::custom(message))
}

/// Check the serial settings shared by every link section
fn validate_link(section: &str, port: &str, baud_rate: u32, stop_bits: u8, timeout_ms: u64) -> Result<()> {
    if port.is_empty() {
        return Err(invalid(format!("{}.port cannot be empty", section)));
    }

    if !SUPPORTED_BAUD_RATES.contains(&baud_rate) {
        return Err(invalid(format!(
            "{}.baud_rate must be one of: 9600, 19200, 38400, 57600, 115200",
            section
        )));
    }

    if stop_bits != 1 && stop_bits != 2 {
        return Err(invalid(format!("{}.stop_bits must be 1 or 2", section)));
    }

    if timeout_ms == 0 || timeout_ms > 10000 {
        return Err(invalid(format!("{}.timeout_ms must be between 1 and 10000", section)));
    }

    Ok(())
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ins_link::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        let input = &self.input;
        validate_link("input", &input.port, input.baud_rate, input.stop_bits, input.timeout_ms)?;

        // The forwarding port is only required when forwarding is on
        let output = &self.output;
        if output.enabled {
            validate_link("output", &output.port, output.baud_rate, output.stop_bits, output.timeout_ms)?;
        }

        let generator = &self.generator;
        validate_link(
            "generator",
            &generator.port,
            generator.baud_rate,
            generator.stop_bits,
            generator.timeout_ms,
        )?;

        if generator.rate_hz == 0 || generator.rate_hz > 1000 {
            return Err(invalid("generator.rate_hz must be between 1 and 1000"));
        }

        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(invalid("telemetry log_dir cannot be empty when enabled"));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(invalid("max_records_per_file must be greater than 0"));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(invalid("max_files_to_keep must be greater than 0"));
        }

        if self.telemetry.format != "jsonl" {
            return Err(invalid("telemetry format must be 'jsonl' (only supported format)"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging.level cannot be empty"));
        }

        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            return Err(invalid(format!("logging.level is not a valid filter: {}", e)));
        }

        if matches!(self.logging.file_dir.as_deref(), Some("")) {
            return Err(invalid("logging.file_dir cannot be empty when set"));
        }

        Ok(())
    }
}
