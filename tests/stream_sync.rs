//! Stream synchronization over in-memory byte sources, through the public API.

use std::time::Duration;

use ins_link::error::FrameError;
use ins_link::frame::encoder::{encode_raw, generate_frame};
use ins_link::frame::protocol::{RawTelemetry, FRAME_LEN};
use ins_link::frame::stream::FrameStream;
use ins_link::frame::sync::{FrameSynchronizer, ResyncEvent, SyncEvent, SyncStats};
use rand::rngs::StdRng;
use rand::SeedableRng;

const READ_TIMEOUT: Duration = Duration::from_millis(100);

fn frame(roll: i16, pitch: i16) -> Vec<u8> {
    encode_raw(&RawTelemetry { roll, pitch, ..Default::default() }).to_vec()
}

async fn drain(mut stream: FrameStream<&[u8]>) -> (Vec<SyncEvent>, SyncStats) {
    let mut events = Vec::new();
    while let Some(event) = stream.next_event().await.unwrap() {
        events.push(event);
    }
    (events, stream.stats())
}

#[tokio::test]
async fn test_garbage_between_frames_is_one_resync() {
    let mut data = frame(16384, 0);
    data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44]);
    data.extend(frame(-16384, 8192));

    let (events, stats) = drain(FrameStream::new(&data[..], READ_TIMEOUT)).await;

    assert_eq!(events.len(), 3);
    match &events[0] {
        SyncEvent::Frame(f) => {
            assert_eq!(f.offset, 0);
            assert_eq!(f.record.roll, 45.0);
        }
        other => panic!("Expected frame, got: {:?}", other),
    }
    assert_eq!(
        events[1],
        SyncEvent::Resync(ResyncEvent { skipped: 5, resumed_at: 37, cause: None })
    );
    match &events[2] {
        SyncEvent::Frame(f) => {
            assert_eq!(f.offset, 37);
            assert_eq!(f.record.roll, -45.0);
            assert_eq!(f.record.pitch, 22.5);
        }
        other => panic!("Expected frame, got: {:?}", other),
    }
    assert_eq!(stats, SyncStats { frames: 2, resyncs: 1, bytes_skipped: 5 });
}

#[tokio::test]
async fn test_corrupted_frame_is_skipped_with_cause() {
    let mut corrupted = frame(0, 0);
    corrupted[30] ^= 0x01;
    let data = [frame(100, 100), corrupted, frame(200, 200)].concat();

    let (events, stats) = drain(FrameStream::new(&data[..], READ_TIMEOUT)).await;

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[1],
        SyncEvent::Resync(ResyncEvent {
            skipped: FRAME_LEN,
            resumed_at: 64,
            cause: Some(FrameError::ChecksumMismatch { expected: 0x1A, found: 0x1B }),
        })
    );
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.bytes_skipped, FRAME_LEN as u64);
}

#[tokio::test]
async fn test_small_reads_give_same_events() {
    let mut data = vec![0xAA, 0x5A];
    data.extend(frame(1, 2));
    data.extend_from_slice(&[0x5A, 0xA5, 0x1A]);
    data.extend(frame(3, 4));
    data.extend(frame(5, 6));

    let (whole, whole_stats) = drain(FrameStream::new(&data[..], READ_TIMEOUT)).await;
    for chunk_size in [1, 7, 31, 33] {
        let stream = FrameStream::with_chunk_size(&data[..], READ_TIMEOUT, chunk_size);
        let (events, stats) = drain(stream).await;
        assert_eq!(events, whole, "chunk size {}", chunk_size);
        assert_eq!(stats, whole_stats);
    }
    assert_eq!(whole_stats.frames, 3);
    assert_eq!(whole_stats.resyncs, 2);
}

#[tokio::test]
async fn test_generated_frames_all_lock() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data: Vec<u8> = (0..50).flat_map(|_| generate_frame(&mut rng)).collect();
    // Partial frame at the end of input is left unscanned
    data.extend_from_slice(&generate_frame(&mut rng)[..20]);

    let (events, stats) = drain(FrameStream::new(&data[..], READ_TIMEOUT)).await;

    assert_eq!(events.len(), 50);
    assert!(events.iter().all(|e| matches!(e, SyncEvent::Frame(f) if f.record.valid)));
    assert_eq!(stats, SyncStats { frames: 50, resyncs: 0, bytes_skipped: 0 });
}

#[test]
fn test_synchronizer_fed_one_byte_at_a_time() {
    let mut data = frame(10, 20);
    data.extend_from_slice(&[0x01, 0x02, 0x03]);
    data.extend(frame(30, 40));
    data.extend_from_slice(&[0x07; 4]);

    let mut sync = FrameSynchronizer::new();
    let mut events = Vec::new();
    for byte in &data {
        sync.push(std::slice::from_ref(byte));
        events.extend(sync.events());
    }
    events.extend(sync.finish());

    let resyncs: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::Resync(r) => Some((r.skipped, r.resumed_at)),
            _ => None,
        })
        .collect();
    assert_eq!(resyncs, vec![(3, 35), (4, 71)]);
    assert_eq!(sync.stats().frames, 2);
    assert_eq!(sync.buffered(), 0);
}
