//! Stage Timer - A dual countdown timer server for presentations
//!
//! This library provides two independent countdown engines, one for the
//! presentation and one for the Q&A that follows, each with a drift-free
//! wall-clock countdown, live time adjustment and a looping end alarm.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::ParseError;
pub use state::{
    AppState, Phase, Ringtone, TimerDefaults, TimerEngine, TimerHandle, TimerSnapshot, TimerStatus,
};
pub use utils::signals::shutdown_signal;
