//! # INS Link
//!
//! Decode attitude/INS telemetry frames from a serial link, or generate mock
//! frames for testing downstream consumers without hardware.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use ins_link::config::Config;
use ins_link::generator::run_generator;
use ins_link::logging::init_logging;
use ins_link::monitor::Monitor;
use ins_link::serial::{open_frame_stream, open_writer, LinkSettings};
use ins_link::telemetry::logger::TelemetryLogger;

#[derive(Parser, Debug)]
#[command(name = "ins-link", version, about = "Attitude/INS telemetry frame decoder and generator")]
struct Cli {
    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(long, short, value_name = "PATH", global = true, env = "INS_LINK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode frames from the sensor link
    Monitor(MonitorArgs),

    /// Write random mock frames to a serial port
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct MonitorArgs {
    /// Sensor port (overrides [input].port)
    #[arg(long)]
    port: Option<String>,

    /// Forward "roll, pitch" lines to this port (enables [output])
    #[arg(long, value_name = "PORT")]
    forward: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output port (overrides [generator].port)
    #[arg(long)]
    port: Option<String>,

    /// Frames per second (overrides [generator].rate_hz)
    #[arg(long)]
    rate_hz: Option<u32>,

    /// Stop after this many frames
    #[arg(long)]
    count: Option<u64>,
}

impl Cli {
    /// Load the configuration file and apply command-line overrides
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        match &self.command {
            Command::Monitor(args) => {
                if let Some(port) = &args.port {
                    config.input.port = port.clone();
                }
                if let Some(port) = &args.forward {
                    config.output.enabled = true;
                    config.output.port = port.clone();
                }
            }
            Command::Generate(args) => {
                if let Some(port) = &args.port {
                    config.generator.port = port.clone();
                }
                if let Some(rate_hz) = args.rate_hz {
                    config.generator.rate_hz = rate_hz;
                }
            }
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Main entry point for INS Link
///
/// # Control Flow
///
/// 1. Parse arguments, load configuration, set up logging
/// 2. `monitor`: open the sensor link, run the synchronizer and log, record
///    and forward every frame until the link closes or Ctrl+C
/// 3. `generate`: write random frames at the configured rate until the count
///    is reached or Ctrl+C
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let _log_guard = init_logging(&config.logging);

    info!("INS Link v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Monitor(_) => monitor(&config).await,
        Command::Generate(args) => generate(&config, args.count).await,
    }
}

async fn monitor(config: &Config) -> Result<()> {
    let mut stream = open_frame_stream(&LinkSettings::from(&config.input))?;

    let recorder = if config.telemetry.enabled {
        let logger = TelemetryLogger::new(&config.telemetry)?;
        info!("Recording telemetry to {}", config.telemetry.log_dir);
        Some(logger)
    } else {
        None
    };

    let forwarder = if config.output.enabled {
        Some(open_writer(&LinkSettings::from(&config.output))?)
    } else {
        None
    };

    let mut monitor = Monitor::new(recorder, forwarder);
    info!("Listening for frames on {}", config.input.port);
    info!("Press Ctrl+C to exit");

    tokio::select! {
        result = monitor.run(&mut stream) => {
            let stats = result?;
            info!("Input closed after {} frames ({} resyncs)", stats.frames, stats.resyncs);
        }
        _ = tokio::signal::ctrl_c() => {
            let stats = stream.stats();
            info!("Received Ctrl+C, shutting down...");
            info!(
                "Total frames: {}, resyncs: {}, bytes skipped: {}",
                stats.frames, stats.resyncs, stats.bytes_skipped
            );
        }
    }

    if let Some(attitude) = monitor.last_attitude() {
        info!("Last attitude: {}", attitude.line());
    }

    Ok(())
}

async fn generate(config: &Config, count: Option<u64>) -> Result<()> {
    let mut writer = open_writer(&LinkSettings::from(&config.generator))?;
    let mut rng = StdRng::from_entropy();

    tokio::select! {
        result = run_generator(&mut writer, &mut rng, config.generator.rate_hz, count) => {
            let sent = result?;
            info!("Sent {} frames", sent);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            info!("Total bytes sent: {}", writer.bytes_sent());
        }
    }

    Ok(())
}
