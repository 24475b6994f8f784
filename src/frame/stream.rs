//! # Async Frame Stream
//!
//! Drives a [`FrameSynchronizer`] from any `AsyncRead` byte source.
//!
//! Reading is the only suspension point. Each read is bounded by the link's
//! read timeout; a timeout yields no data and reading continues, so the caller
//! cancels by simply not polling again.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::trace;

use super::sync::{FrameSynchronizer, SyncEvent, SyncStats};
use crate::error::Result;

/// Default read chunk size
pub const READ_CHUNK_SIZE: usize = 256;

/// Frame stream over an async byte source
pub struct FrameStream<R> {
    inner: R,
    sync: FrameSynchronizer,
    read_timeout: Duration,
    chunk: Vec<u8>,
    eof: bool,
}

impl<R> std::fmt::Debug for FrameStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStream")
            .field("sync", &self.sync)
            .field("read_timeout", &self.read_timeout)
            .field("eof", &self.eof)
            .finish_non_exhaustive()
    }
}

impl<R: AsyncRead + Unpin> FrameStream<R> {
    /// Create a frame stream with the given per-read timeout
    pub fn new(inner: R, read_timeout: Duration) -> Self {
        Self::with_chunk_size(inner, read_timeout, READ_CHUNK_SIZE)
    }

    pub fn with_chunk_size(inner: R, read_timeout: Duration, chunk_size: usize) -> Self {
        Self {
            inner,
            sync: FrameSynchronizer::new(),
            read_timeout,
            chunk: vec![0u8; chunk_size.max(1)],
            eof: false,
        }
    }

    /// Next frame or resync event
    ///
    /// Returns `Ok(None)` once the source reports end of input and every
    /// buffered event has been delivered.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying read fails with anything other than an
    /// interruption or timeout.
    pub async fn next_event(&mut self) -> Result<Option<SyncEvent>> {
        loop {
            if let Some(event) = self.sync.next_event() {
                return Ok(Some(event));
            }

            if self.eof {
                return Ok(self.sync.finish());
            }

            match timeout(self.read_timeout, self.inner.read(&mut self.chunk)).await {
                Err(_) => {
                    trace!("No data within {:?}", self.read_timeout);
                }
                Ok(Ok(0)) => {
                    trace!("End of input at offset {}", self.sync.offset() + self.sync.buffered() as u64);
                    self.eof = true;
                }
                Ok(Ok(n)) => self.sync.push(&self.chunk[..n]),
                Ok(Err(e)) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::TimedOut) => {}
                Ok(Err(e)) => return Err(e.into()),
            }
        }
    }

    pub fn stats(&self) -> SyncStats {
        self.sync.stats()
    }

    /// Drop buffered bytes and resume scanning from fresh input
    pub fn reset(&mut self) {
        self.sync.reset();
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
