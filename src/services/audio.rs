//! Audio output capability used by the alarm driver and ringtone previews

use std::{
    io::Write,
    process::Stdio,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::state::Ringtone;

/// Capability to play one named tone, fire-and-forget
pub trait ToneSink: Send + Sync {
    fn play_tone(&self, tone: Ringtone);

    /// Re-arm an output that stopped accepting tones
    fn resume(&self) {}
}

/// Where tones end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioBackend {
    /// Writes BEL characters to stderr
    TerminalBell,
    /// Runs `<program> <tone-name>`; a tone is skipped while the previous one still plays
    Player(String),
}

impl AudioBackend {
    pub fn from_player(player: Option<String>) -> Self {
        match player {
            Some(program) if !program.trim().is_empty() => AudioBackend::Player(program),
            _ => AudioBackend::TerminalBell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Uninitialized,
    Ready,
    /// A tone failed; further tones are skipped until `resume`
    Suspended,
}

/// Process-wide audio output, initialised on first use
#[derive(Debug)]
pub struct AudioOutput {
    backend: AudioBackend,
    state: Mutex<OutputState>,
    playing: Mutex<Option<Child>>,
}

static SHARED_OUTPUT: OnceLock<Arc<AudioOutput>> = OnceLock::new();

impl AudioOutput {
    pub fn new(backend: AudioBackend) -> Self {
        Self {
            backend,
            state: Mutex::new(OutputState::Uninitialized),
            playing: Mutex::new(None),
        }
    }

    /// The shared output; the first caller's backend wins
    pub fn shared(backend: AudioBackend) -> Arc<AudioOutput> {
        Arc::clone(SHARED_OUTPUT.get_or_init(|| {
            info!("Initializing shared audio output: {:?}", backend);
            Arc::new(AudioOutput::new(backend))
        }))
    }

    pub fn state(&self) -> OutputState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: OutputState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn emit(&self, tone: Ringtone) -> std::io::Result<()> {
        match &self.backend {
            AudioBackend::TerminalBell => {
                let bells = "\x07".repeat(bell_pulses(tone));
                let mut stderr = std::io::stderr();
                stderr.write_all(bells.as_bytes())?;
                stderr.flush()
            }
            AudioBackend::Player(program) => {
                let mut playing = self.playing.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(child) = playing.as_mut() {
                    if child.try_wait()?.is_none() {
                        debug!("Previous tone still playing, skipping {} tone", tone);
                        return Ok(());
                    }
                }

                let child = Command::new(program)
                    .arg(tone.as_str())
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .kill_on_drop(true)
                    .spawn()?;
                *playing = Some(child);
                Ok(())
            }
        }
    }
}

impl ToneSink for AudioOutput {
    fn play_tone(&self, tone: Ringtone) {
        if tone.is_silent() {
            return;
        }

        match self.state() {
            OutputState::Suspended => {
                debug!("Audio output suspended, skipping {} tone", tone);
                return;
            }
            OutputState::Uninitialized => self.set_state(OutputState::Ready),
            OutputState::Ready => {}
        }

        if let Err(e) = self.emit(tone) {
            warn!("Failed to play {} tone, suspending audio output: {}", tone, e);
            self.set_state(OutputState::Suspended);
        }
    }

    fn resume(&self) {
        if self.state() != OutputState::Ready {
            debug!("Resuming audio output");
            self.set_state(OutputState::Ready);
        }
    }
}

/// Number of terminal bells approximating each tone's pattern
fn bell_pulses(tone: Ringtone) -> usize {
    match tone {
        Ringtone::Bell => 1,
        Ringtone::Digital => 2,
        Ringtone::Alarm => 3,
        Ringtone::None => 0,
    }
}

/// Output that discards every tone
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTone;

impl ToneSink for NullTone {
    fn play_tone(&self, _tone: Ringtone) {}
}

/// Output that remembers what it was asked to play
#[derive(Debug, Default)]
pub struct RecordingTone {
    played: Mutex<Vec<Ringtone>>,
    resumes: Mutex<usize>,
}

impl RecordingTone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Ringtone> {
        self.played.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self) -> usize {
        self.played.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn resumes(&self) -> usize {
        *self.resumes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ToneSink for RecordingTone {
    fn play_tone(&self, tone: Ringtone) {
        if tone.is_silent() {
            return;
        }
        self.played.lock().unwrap_or_else(PoisonError::into_inner).push(tone);
    }

    fn resume(&self) {
        *self.resumes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }
}
