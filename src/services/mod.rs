//! External capability module
//!
//! This module contains the collaborators the engine relies on but does
//! not own: the clock it reads and the audio output it plays tones on.

pub mod audio;
pub mod clock;

// Re-export main types
pub use audio::{AudioBackend, AudioOutput, NullTone, OutputState, RecordingTone, ToneSink};
pub use clock::{remaining_secs, Clock, ManualClock, MonotonicClock};
