//! Alarm driver background task

use std::sync::Arc;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::{
    services::ToneSink,
    state::{AlarmEpisode, Phase},
};

/// Plays the episode's ringtone at `started_at`, then once per cadence, forever.
///
/// The task never looks at the engine again; cancelling it is the only
/// way an episode ends.
pub async fn alarm_driver_task(
    phase: Phase,
    episode: AlarmEpisode,
    started_at: Instant,
    tone: Arc<dyn ToneSink>,
) {
    let Some(cadence) = episode.ringtone.cadence() else {
        return;
    };

    info!(
        "{} alarm #{} playing {} every {:?}",
        phase, episode.id, episode.ringtone, cadence
    );

    let mut interval = interval_at(started_at, cadence);
    // a stalled process resumes with one tone, not a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        debug!("{} alarm #{} tone", phase, episode.id);
        tone.play_tone(episode.ringtone);
    }
}
