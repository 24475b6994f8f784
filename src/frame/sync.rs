//! # Stream Synchronizer
//!
//! Locates frame boundaries in an unbounded byte stream.
//!
//! Bytes are pushed in arbitrary chunks. The synchronizer scans for the sync
//! header, validates each 32-byte candidate window with the decoder and either
//! yields it or advances by a single byte and keeps scanning, so one corrupted
//! byte costs one resynchronization step rather than a frame's worth of data.
//!
//! Every contiguous run of discarded bytes is reported as exactly one
//! [`ResyncEvent`], emitted just before the frame that re-acquired lock (or by
//! [`FrameSynchronizer::finish`] when the input ends).

use bytes::{Buf, BytesMut};

use super::decoder::decode_frame;
use super::protocol::{DecodedRecord, FRAME_LEN, SYNC_HEADER};
use crate::error::FrameError;

const INITIAL_BUFFER_CAPACITY: usize = 4 * FRAME_LEN;

/// A validated frame found in the stream
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedFrame {
    /// Absolute stream offset of the sync header
    pub offset: u64,

    /// Wire bytes of the frame
    pub bytes: [u8; FRAME_LEN],

    pub record: DecodedRecord,
}

/// One resynchronization: a run of bytes dropped between accepted frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncEvent {
    /// Number of bytes discarded in this run
    pub skipped: usize,

    /// Absolute stream offset where scanning resumed
    pub resumed_at: u64,

    /// Last validation failure seen during the run; `None` if no candidate
    /// header was found among the discarded bytes
    pub cause: Option<FrameError>,
}

/// Output of the synchronizer
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Frame(SyncedFrame),
    Resync(ResyncEvent),
}

/// Running counters for one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub frames: u64,
    pub resyncs: u64,
    pub bytes_skipped: u64,
}

/// Sliding-buffer frame synchronizer for a single byte stream
#[derive(Debug)]
pub struct FrameSynchronizer {
    buf: BytesMut,
    /// Absolute stream offset of `buf[0]`
    offset: u64,
    /// Bytes discarded since the last accepted frame
    skipped: usize,
    last_error: Option<FrameError>,
    /// Frame held back while its preceding resync event is delivered
    ready: Option<SyncedFrame>,
    stats: SyncStats,
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSynchronizer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            offset: 0,
            skipped: 0,
            last_error: None,
            ready: None,
            stats: SyncStats::default(),
        }
    }

    /// Append bytes read from the stream
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Next frame or resync event, or `None` when more input is needed
    pub fn next_event(&mut self) -> Option<SyncEvent> {
        if let Some(frame) = self.ready.take() {
            return Some(SyncEvent::Frame(frame));
        }

        loop {
            let Some(pos) = find_header(&self.buf) else {
                // A trailing first header byte may pair with the next chunk
                let keep = usize::from(self.buf.last() == Some(&SYNC_HEADER[0]));
                self.discard(self.buf.len() - keep);
                return None;
            };

            self.discard(pos);
            if self.buf.len() < FRAME_LEN {
                return None;
            }

            match decode_frame(&self.buf[..FRAME_LEN]) {
                Ok(record) => {
                    let mut bytes = [0u8; FRAME_LEN];
                    bytes.copy_from_slice(&self.buf[..FRAME_LEN]);
                    let frame = SyncedFrame { offset: self.offset, bytes, record };

                    let resync = self.take_resync();
                    self.buf.advance(FRAME_LEN);
                    self.offset += FRAME_LEN as u64;
                    self.stats.frames += 1;

                    return match resync {
                        Some(event) => {
                            self.ready = Some(frame);
                            Some(SyncEvent::Resync(event))
                        }
                        None => Some(SyncEvent::Frame(frame)),
                    };
                }
                Err(err) => {
                    self.last_error = Some(err);
                    self.discard(1);
                }
            }
        }
    }

    /// Drain every event available from the buffered bytes
    pub fn events(&mut self) -> impl Iterator<Item = SyncEvent> + '_ {
        std::iter::from_fn(move || self.next_event())
    }

    /// Signal end of input
    ///
    /// Reports a pending discard run, if any. Bytes still buffered (fewer than
    /// one frame) are left unscanned.
    pub fn finish(&mut self) -> Option<SyncEvent> {
        if let Some(frame) = self.ready.take() {
            return Some(SyncEvent::Frame(frame));
        }
        self.take_resync().map(SyncEvent::Resync)
    }

    /// Drop buffered bytes and pending state, keeping the stream offset and stats
    pub fn reset(&mut self) {
        self.offset += self.buf.len() as u64;
        self.buf.clear();
        self.skipped = 0;
        self.last_error = None;
        self.ready = None;
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Number of bytes buffered but not yet consumed
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Absolute stream offset of the next unconsumed byte
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn discard(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.buf.advance(count);
        self.offset += count as u64;
        self.skipped += count;
        self.stats.bytes_skipped += count as u64;
    }

    fn take_resync(&mut self) -> Option<ResyncEvent> {
        if self.skipped == 0 {
            return None;
        }

        let event = ResyncEvent {
            skipped: self.skipped,
            resumed_at: self.offset,
            cause: self.last_error.take(),
        };
        self.skipped = 0;
        self.stats.resyncs += 1;
        Some(event)
    }
}

fn find_header(buf: &[u8]) -> Option<usize> {
    buf.windows(SYNC_HEADER.len()).position(|w| w == SYNC_HEADER)
}
