//! State management module
//!
//! The pure countdown engine, the reactive handle that drives it, and the
//! application state that owns one handle per phase.

pub mod app_state;
pub mod engine;
pub mod timer_handle;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerDefaults};
pub use engine::{AlarmEpisode, TimerEngine, MIN_CONFIGURED_SECS};
pub use timer_handle::TimerHandle;
pub use timer_state::{Phase, Ringtone, TimerSnapshot, TimerStatus};
