//! # Monitor
//!
//! Consumes synchronizer events from the sensor link.
//!
//! For every frame the monitor logs the decoded record, appends it to the
//! telemetry log and forwards the attitude line. Resync events are logged with
//! the failure kind and the offset where scanning resumed. Failures on the
//! side channels are logged and never stop the stream.

use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::frame::protocol::hex_dump;
use crate::frame::stream::FrameStream;
use crate::frame::sync::{ResyncEvent, SyncEvent, SyncStats, SyncedFrame};
use crate::serial::sink::LinkSink;
use crate::serial::LinkWriter;
use crate::telemetry::attitude::Attitude;
use crate::telemetry::logger::TelemetryLogger;

/// Number of frames between status log messages
pub const STATS_INTERVAL_FRAMES: u64 = 100;

/// Per-stream frame handler
pub struct Monitor<P> {
    recorder: Option<TelemetryLogger>,
    forwarder: Option<LinkWriter<P>>,
    last_attitude: Option<Attitude>,
    frames_seen: u64,
}

impl<P> std::fmt::Debug for Monitor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("recorder", &self.recorder)
            .field("forwarder", &self.forwarder)
            .field("last_attitude", &self.last_attitude)
            .field("frames_seen", &self.frames_seen)
            .finish()
    }
}

impl<P: LinkSink> Monitor<P> {
    pub fn new(recorder: Option<TelemetryLogger>, forwarder: Option<LinkWriter<P>>) -> Self {
        Self {
            recorder,
            forwarder,
            last_attitude: None,
            frames_seen: 0,
        }
    }

    /// Attitude of the most recent valid frame
    pub fn last_attitude(&self) -> Option<Attitude> {
        self.last_attitude
    }

    /// Run until the stream ends
    ///
    /// # Errors
    ///
    /// Returns error only if reading the stream fails.
    pub async fn run<R: AsyncRead + Unpin>(&mut self, stream: &mut FrameStream<R>) -> Result<SyncStats> {
        while let Some(event) = stream.next_event().await? {
            let is_frame = matches!(event, SyncEvent::Frame(_));
            self.handle_event(event).await;

            if is_frame && self.frames_seen % STATS_INTERVAL_FRAMES == 0 {
                let stats = stream.stats();
                info!(
                    "Received {} frames ({} resyncs, {} bytes skipped)",
                    stats.frames, stats.resyncs, stats.bytes_skipped
                );
            }
        }

        self.flush();
        Ok(stream.stats())
    }

    pub async fn handle_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Frame(frame) => self.handle_frame(&frame).await,
            SyncEvent::Resync(resync) => log_resync(&resync),
        }
    }

    async fn handle_frame(&mut self, frame: &SyncedFrame) {
        self.frames_seen += 1;
        debug!("Frame at offset {}:\n{}", frame.offset, frame.record);
        debug!("{}", hex_dump(&frame.bytes));

        let attitude = Attitude::from(&frame.record);
        self.last_attitude = Some(attitude);

        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.log(&frame.record, frame.offset) {
                warn!("Failed to record telemetry: {}", e);
            }
        }

        if let Some(forwarder) = self.forwarder.as_mut() {
            let line = attitude.line();
            if let Err(e) = forwarder.send(line.as_bytes()).await {
                warn!("Failed to forward attitude: {}", e);
            }
        }
    }

    fn flush(&mut self) {
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.flush() {
                warn!("Failed to flush telemetry log: {}", e);
            }
        }
    }
}

fn log_resync(resync: &ResyncEvent) {
    match resync.cause {
        Some(cause) => warn!(
            kind = cause.kind(),
            skipped = resync.skipped,
            resumed_at = resync.resumed_at,
            "Resynchronized after {}",
            cause
        ),
        None => warn!(
            kind = "no_sync_header",
            skipped = resync.skipped,
            resumed_at = resync.resumed_at,
            "Resynchronized after {} bytes without a sync header",
            resync.skipped
        ),
    }
}
