//! Clock driver background task

use std::{ops::ControlFlow, time::Duration};

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::state::Phase;

/// Default polling cadence; fast enough to catch a zero-crossing within 200ms
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Calls `tick` every `poll_interval` after `armed_at` until it breaks.
///
/// The countdown itself is recomputed from an absolute target inside
/// `tick`, so late or skipped ticks only delay the display, never skew it.
pub async fn clock_driver_task<F>(phase: Phase, armed_at: Instant, poll_interval: Duration, mut tick: F)
where
    F: FnMut() -> ControlFlow<()> + Send,
{
    debug!("Starting {} clock driver every {:?}", phase, poll_interval);

    let mut interval = interval_at(armed_at + poll_interval, poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if tick().is_break() {
            break;
        }
    }

    debug!("{} clock driver finished", phase);
}
