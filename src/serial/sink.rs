//! Byte sinks behind [`LinkWriter`](super::LinkWriter).
//!
//! Generated frames and forwarded attitude lines both end up in a [`LinkSink`].
//! On hardware that is a serial port; in tests it is an in-memory buffer or
//! the recording [`mocks::MockSink`].

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Destination for outgoing link messages
#[async_trait]
pub trait LinkSink: Send {
    /// Write one complete message
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Push buffered bytes onto the wire
    async fn flush(&mut self) -> io::Result<()>;
}

/// Sink over any async writer (a `SerialStream` in production)
#[derive(Debug)]
pub struct AsyncWriteSink<W> {
    writer: W,
}

impl<W> AsyncWriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> LinkSink for AsyncWriteSink<W> {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }
}
