//! # JSONL Telemetry Logger
//!
//! Records decoded frames as JSON Lines with file rotation.
//!
//! Each file holds at most `max_records_per_file` records; once a file is full
//! a new one is started and only the newest `max_files_to_keep` files remain.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TelemetryConfig;
use crate::error::Result;
use crate::frame::protocol::DecodedRecord;

const FILE_PREFIX: &str = "telemetry_";
const FILE_EXTENSION: &str = "jsonl";

/// One line of the telemetry log
#[derive(Debug, Serialize)]
struct TelemetryEntry<'a> {
    timestamp: String,
    offset: u64,
    #[serde(flatten)]
    record: &'a DecodedRecord,
}

/// Rotating JSONL writer for decoded records
pub struct TelemetryLogger {
    dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    writer: Option<BufWriter<File>>,
    current_path: Option<PathBuf>,
    records_in_file: usize,
    files_created: u64,
}

impl std::fmt::Debug for TelemetryLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLogger")
            .field("dir", &self.dir)
            .field("current_path", &self.current_path)
            .field("records_in_file", &self.records_in_file)
            .finish_non_exhaustive()
    }
}

impl TelemetryLogger {
    /// Create a logger writing into `config.log_dir`
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be created
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let dir = PathBuf::from(&config.log_dir);
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            max_records_per_file: config.max_records_per_file.max(1),
            max_files_to_keep: config.max_files_to_keep.max(1),
            writer: None,
            current_path: None,
            records_in_file: 0,
            files_created: 0,
        })
    }

    /// Append one decoded record
    ///
    /// Values are rounded to 3 decimals; `offset` is the frame's position in
    /// the byte stream.
    pub fn log(&mut self, record: &DecodedRecord, offset: u64) -> Result<()> {
        self.log_at(record, offset, Utc::now())
    }

    fn log_at(&mut self, record: &DecodedRecord, offset: u64, now: DateTime<Utc>) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate(now)?;
        }

        let rounded = record.rounded();
        let entry = TelemetryEntry {
            timestamp: now.to_rfc3339(),
            offset,
            record: &rounded,
        };

        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, &entry)?;
            writer.write_all(b"\n")?;
            self.records_in_file += 1;
        }
        Ok(())
    }

    /// Flush buffered lines to disk
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    fn rotate(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.flush()?;

        // Sequence suffix keeps names unique and ordered within one second
        let name = format!(
            "{}{}_{:04}.{}",
            FILE_PREFIX,
            now.format("%Y%m%dT%H%M%S"),
            self.files_created,
            FILE_EXTENSION
        );
        let path = self.dir.join(name);
        let file = File::create(&path)?;
        debug!("Telemetry log rotated to {}", path.display());

        self.writer = Some(BufWriter::new(file));
        self.current_path = Some(path);
        self.records_in_file = 0;
        self.files_created += 1;

        self.prune()
    }

    /// Delete the oldest log files beyond `max_files_to_keep`
    fn prune(&self) -> Result<()> {
        let mut files = list_log_files(&self.dir)?;
        if files.len() <= self.max_files_to_keep {
            return Ok(());
        }

        files.sort();
        let excess = files.len() - self.max_files_to_keep;
        for path in files.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to remove old telemetry log {}: {}", path.display(), e);
            }
        }
        Ok(())
    }
}

impl Drop for TelemetryLogger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_log = path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(FILE_PREFIX));
        if is_log {
            files.push(path);
        }
    }
    Ok(files)
}
