//! # Mock Frame Generator
//!
//! Writes randomly generated frames to a byte sink at a fixed rate, for
//! exercising downstream consumers without sensor hardware.

use rand::Rng;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::error::Result;
use crate::frame::encoder::generate_frame;
use crate::frame::protocol::hex_dump;
use crate::serial::sink::LinkSink;
use crate::serial::LinkWriter;

/// Frame period for a transmission rate
pub fn frame_period(rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)))
}

/// Send frames at `rate_hz` until `count` frames are sent (forever if `None`)
///
/// Write failures are logged and the frame is skipped. Returns the number of
/// frames actually sent.
pub async fn run_generator<P: LinkSink, R: Rng>(
    writer: &mut LinkWriter<P>,
    rng: &mut R,
    rate_hz: u32,
    count: Option<u64>,
) -> Result<u64> {
    let mut ticker = interval(frame_period(rate_hz));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Generating mock frames at {}Hz on {}", rate_hz, writer.device_path());

    let mut attempted: u64 = 0;
    let mut sent: u64 = 0;

    while count.map_or(true, |limit| attempted < limit) {
        ticker.tick().await;
        attempted += 1;

        let frame = generate_frame(rng);
        match writer.send(&frame).await {
            Ok(()) => {
                sent += 1;
                info!("Generated Mock Data: {}", hex_dump(&frame));
            }
            Err(e) => warn!("Failed to send frame: {}", e),
        }
    }

    Ok(sent)
}
