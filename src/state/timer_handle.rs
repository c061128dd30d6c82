//! Reactive wrapper that hosts use to drive one engine

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::{sync::watch, time::Instant};
use tracing::{debug, info};

use super::{
    engine::{AlarmEpisode, TimerEngine},
    Phase, Ringtone, TimerSnapshot, TimerStatus,
};
use crate::{
    services::{Clock, MonotonicClock, ToneSink},
    tasks::{alarm_driver_task, clock_driver_task, TaskGuard, DEFAULT_POLL_INTERVAL},
};

/// Background work currently armed for one engine
#[derive(Debug, Default)]
struct EngineTasks {
    poll: Option<TaskGuard>,
    alarm: Option<(u64, TaskGuard)>,
    shut_down: bool,
}

struct Shared {
    engine: Mutex<TimerEngine>,
    tasks: Mutex<EngineTasks>,
    updates: watch::Sender<TimerSnapshot>,
    tone: Arc<dyn ToneSink>,
    poll_interval: Duration,
}

/// One countdown engine together with its clock driver and alarm driver.
///
/// Commands mutate the engine synchronously and then reconcile the
/// background tasks with the new state: a clock driver runs exactly while
/// the engine is running and an alarm driver exactly while an alarm
/// episode is ringing. Every visible change is pushed to receivers from
/// [`subscribe`](Self::subscribe).
///
/// Commands that arm background work must be issued from inside a tokio runtime.
#[derive(Clone)]
pub struct TimerHandle {
    shared: Arc<Shared>,
}

impl TimerHandle {
    pub fn new(
        phase: Phase,
        initial_duration: u64,
        clock: Arc<dyn Clock>,
        tone: Arc<dyn ToneSink>,
        poll_interval: Duration,
    ) -> Self {
        let engine = TimerEngine::new(phase, initial_duration, clock);
        let (updates, _) = watch::channel(engine.snapshot());

        info!("Created {} timer with {}s", phase, initial_duration);
        Self {
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                tasks: Mutex::new(EngineTasks::default()),
                updates,
                tone,
                poll_interval,
            }),
        }
    }

    /// Handle with its own monotonic clock and the default poll cadence
    pub fn with_defaults(phase: Phase, initial_duration: u64, tone: Arc<dyn ToneSink>) -> Self {
        Self::new(
            phase,
            initial_duration,
            Arc::new(MonotonicClock::new()),
            tone,
            DEFAULT_POLL_INTERVAL,
        )
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock_engine().phase()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.shared.lock_engine().snapshot()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn start(&self) -> TimerSnapshot {
        self.shared.tone.resume();
        self.apply(TimerEngine::start)
    }

    pub fn pause(&self) -> TimerSnapshot {
        self.apply(TimerEngine::pause)
    }

    pub fn reset(&self) -> TimerSnapshot {
        self.apply(TimerEngine::reset)
    }

    pub fn set_duration(&self, seconds: i64) -> TimerSnapshot {
        self.apply(|engine| engine.set_duration(seconds))
    }

    pub fn adjust(&self, delta_seconds: i64) -> TimerSnapshot {
        self.apply(|engine| engine.adjust(delta_seconds))
    }

    pub fn set_ringtone(&self, ringtone: Ringtone) -> TimerSnapshot {
        self.apply(|engine| engine.set_ringtone(ringtone))
    }

    /// Save from the settings panel: whole minutes plus ringtone
    pub fn apply_settings(&self, minutes: u64, ringtone: Ringtone) -> TimerSnapshot {
        let seconds = i64::try_from(minutes.saturating_mul(60)).unwrap_or(i64::MAX);
        self.apply(|engine| {
            engine.set_duration(seconds);
            engine.set_ringtone(ringtone);
        })
    }

    pub fn stop_alarm(&self) -> TimerSnapshot {
        self.apply(TimerEngine::stop_alarm)
    }

    /// Main-button press: stop a ringing alarm, else pause or start
    pub fn toggle(&self) -> TimerSnapshot {
        self.shared.tone.resume();
        self.apply(TimerEngine::toggle)
    }

    /// Play one tone for auditioning; engine state is untouched
    pub fn preview_ringtone(&self, ringtone: Ringtone) {
        debug!("Previewing {} ringtone", ringtone);
        self.shared.tone.resume();
        self.shared.tone.play_tone(ringtone);
    }

    /// Cancel all background work; later commands no longer arm tasks
    pub fn shutdown(&self) {
        let phase = self.phase();
        let mut tasks = self.shared.lock_tasks();
        tasks.shut_down = true;
        tasks.poll = None;
        tasks.alarm = None;
        info!("{} timer shut down", phase);
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock_tasks().poll.is_some()
    }

    pub fn is_alarm_armed(&self) -> bool {
        self.shared.lock_tasks().alarm.is_some()
    }

    fn apply<F>(&self, command: F) -> TimerSnapshot
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut engine = self.shared.lock_engine();
        command(&mut engine);
        let snapshot = engine.snapshot();
        Shared::reconcile(&self.shared, &engine);
        // publish while locked so a stale snapshot never lands after a newer one
        self.shared.publish(snapshot);
        snapshot
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl Shared {
    fn lock_engine(&self) -> MutexGuard<'_, TimerEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tasks(&self) -> MutexGuard<'_, EngineTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        self.updates.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    /// Bring the armed tasks in line with the engine. Called with the engine locked.
    fn reconcile(this: &Arc<Self>, engine: &TimerEngine) {
        let phase = engine.phase();
        let mut tasks = this.lock_tasks();
        if tasks.shut_down {
            return;
        }

        if engine.status() == TimerStatus::Running {
            if tasks.poll.is_none() {
                tasks.poll = Self::spawn_clock_driver(this, phase);
            }
        } else {
            tasks.poll = None;
        }

        match engine.alarm() {
            Some(episode) => {
                let armed = tasks.alarm.as_ref().map(|(id, _)| *id);
                if armed != Some(episode.id) {
                    tasks.alarm = this
                        .spawn_alarm_driver(phase, episode)
                        .map(|guard| (episode.id, guard));
                }
            }
            None => tasks.alarm = None,
        }
    }

    fn spawn_clock_driver(this: &Arc<Self>, phase: Phase) -> Option<TaskGuard> {
        let weak: Weak<Self> = Arc::downgrade(this);
        TaskGuard::spawn(
            format!("{} clock driver", phase),
            clock_driver_task(
                phase,
                Instant::now(),
                this.poll_interval,
                move || match weak.upgrade() {
                    Some(shared) => shared.tick(),
                    None => ControlFlow::Break(()),
                },
            ),
        )
    }

    fn spawn_alarm_driver(&self, phase: Phase, episode: AlarmEpisode) -> Option<TaskGuard> {
        self.tone.resume();
        TaskGuard::spawn(
            format!("{} alarm driver", phase),
            alarm_driver_task(phase, episode, Instant::now(), Arc::clone(&self.tone)),
        )
    }

    /// One clock driver poll
    fn tick(self: Arc<Self>) -> ControlFlow<()> {
        let mut engine = self.lock_engine();
        if engine.status() != TimerStatus::Running {
            return ControlFlow::Break(());
        }
        if !engine.poll() {
            return ControlFlow::Continue(());
        }

        let snapshot = engine.snapshot();
        Self::reconcile(&self, &engine);
        self.publish(snapshot);
        drop(engine);

        if snapshot.is_running() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}
