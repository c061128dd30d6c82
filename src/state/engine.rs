//! Countdown engine state machine.
//!
//! The engine is wall-clock relative: while running it stores only the
//! absolute instant at which the countdown reaches zero and derives the
//! displayed seconds from that target on every poll. It spawns nothing
//! and performs no I/O; [`TimerHandle`](super::TimerHandle) drives it.
//!
//! ```text
//! Idle ──start──► Running ──pause──► Paused ──start──► Running
//!                    │
//!                    └──(remaining hits 0)──► Completed ──start──► Running
//! any ──reset / set_duration──► Idle
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use super::{Phase, Ringtone, TimerSnapshot, TimerStatus};
use crate::services::clock::{remaining_secs, Clock};

/// Duration applied when a caller configures zero or a negative value
pub const MIN_CONFIGURED_SECS: u64 = 60;

/// A ringing episode. The ringtone is locked when the episode begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmEpisode {
    pub id: u64,
    pub ringtone: Ringtone,
}

pub struct TimerEngine {
    phase: Phase,
    duration: u64,
    remaining: u64,
    status: TimerStatus,
    /// Clock instant (ms) where the countdown ends; only set while running
    target_end_ms: Option<u64>,
    ringtone: Ringtone,
    alarm: Option<AlarmEpisode>,
    episodes: u64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("phase", &self.phase)
            .field("duration", &self.duration)
            .field("remaining", &self.remaining)
            .field("status", &self.status)
            .field("target_end_ms", &self.target_end_ms)
            .field("ringtone", &self.ringtone)
            .field("alarm", &self.alarm)
            .finish()
    }
}

impl TimerEngine {
    pub fn new(phase: Phase, initial_duration: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            phase,
            duration: initial_duration,
            remaining: initial_duration,
            status: TimerStatus::Idle,
            target_end_ms: None,
            ringtone: Ringtone::default(),
            alarm: None,
            episodes: 0,
            clock,
        }
    }

    // Queries

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn ringtone(&self) -> Ringtone {
        self.ringtone
    }

    pub fn target_end_ms(&self) -> Option<u64> {
        self.target_end_ms
    }

    pub fn is_ringing(&self) -> bool {
        self.alarm.is_some()
    }

    pub fn alarm(&self) -> Option<AlarmEpisode> {
        self.alarm
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining: self.remaining,
            duration: self.duration,
            status: self.status,
            ringtone: self.ringtone,
            is_ringing: self.is_ringing(),
        }
    }

    // Commands

    pub fn start(&mut self) {
        if self.is_ringing() {
            self.stop_alarm();
        }
        if self.status == TimerStatus::Running {
            return;
        }

        if self.remaining == 0 {
            self.remaining = self.duration;
        }

        let now = self.clock.now_ms();
        self.target_end_ms = Some(now.saturating_add(self.remaining.saturating_mul(1000)));
        self.status = TimerStatus::Running;
        info!("{} timer started with {}s remaining", self.phase, self.remaining);
    }

    pub fn pause(&mut self) {
        if self.status != TimerStatus::Running {
            return;
        }

        if let Some(target) = self.target_end_ms.take() {
            self.remaining = remaining_secs(target, self.clock.now_ms());
        }
        self.status = TimerStatus::Paused;
        self.stop_alarm();
        info!("{} timer paused with {}s remaining", self.phase, self.remaining);
    }

    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.remaining = self.duration;
        self.target_end_ms = None;
        self.stop_alarm();
        info!("{} timer reset to {}s", self.phase, self.duration);
    }

    /// Reconfigure the countdown; always returns to idle
    pub fn set_duration(&mut self, seconds: i64) {
        let seconds = if seconds <= 0 {
            MIN_CONFIGURED_SECS
        } else {
            seconds as u64
        };
        self.duration = seconds;
        self.remaining = seconds;
        self.status = TimerStatus::Idle;
        self.target_end_ms = None;
        self.stop_alarm();
        info!("{} timer duration set to {}s", self.phase, seconds);
    }

    /// Select the ringtone for future alarms; a ringing episode keeps its tone
    pub fn set_ringtone(&mut self, ringtone: Ringtone) {
        self.ringtone = ringtone;
        debug!("{} timer ringtone set to {}", self.phase, ringtone);
    }

    /// Shift both the remaining time and the total duration by `delta` seconds
    pub fn adjust(&mut self, delta: i64) {
        match (self.status, self.target_end_ms) {
            (TimerStatus::Running, Some(target)) => {
                let shifted = shift_ms(target, delta);
                self.target_end_ms = Some(shifted);
                let remaining = remaining_secs(shifted, self.clock.now_ms());
                if remaining == 0 {
                    info!("{} timer adjusted past zero", self.phase);
                    self.complete();
                } else {
                    self.remaining = remaining;
                }
            }
            _ => self.remaining = shift_secs(self.remaining, delta),
        }

        self.duration = shift_secs(self.duration, delta);
        debug!(
            "{} timer adjusted by {}s: remaining={}s duration={}s",
            self.phase, delta, self.remaining, self.duration
        );
    }

    pub fn stop_alarm(&mut self) {
        if let Some(episode) = self.alarm.take() {
            info!("{} alarm #{} stopped", self.phase, episode.id);
        }
    }

    /// Single main button: silence a ringing alarm, else pause or start
    pub fn toggle(&mut self) {
        if self.is_ringing() {
            self.stop_alarm();
        } else if self.status == TimerStatus::Running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Recompute `remaining` from the target; returns whether the snapshot changed
    pub fn poll(&mut self) -> bool {
        let Some(target) = self.target_end_ms else {
            return false;
        };

        let remaining = remaining_secs(target, self.clock.now_ms());
        if remaining == 0 {
            self.complete();
            return true;
        }
        if remaining != self.remaining {
            self.remaining = remaining;
            return true;
        }
        false
    }

    fn complete(&mut self) {
        self.target_end_ms = None;
        self.remaining = 0;
        self.status = TimerStatus::Completed;
        info!("{} timer completed", self.phase);
        self.start_alarm();
    }

    fn start_alarm(&mut self) {
        if self.ringtone.is_silent() {
            return;
        }
        self.episodes += 1;
        self.alarm = Some(AlarmEpisode {
            id: self.episodes,
            ringtone: self.ringtone,
        });
        info!("{} alarm #{} ringing with {}", self.phase, self.episodes, self.ringtone);
    }
}

fn shift_secs(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn shift_ms(value: u64, delta_secs: i64) -> u64 {
    let delta_ms = delta_secs.unsigned_abs().saturating_mul(1000);
    if delta_secs >= 0 {
        value.saturating_add(delta_ms)
    } else {
        value.saturating_sub(delta_ms)
    }
}
