//! Background tasks module
//!
//! Each engine arms at most one clock driver and one alarm driver at a
//! time, both owned through a [`TaskGuard`].

pub mod alarm_driver;
pub mod clock_driver;
pub mod guard;

// Re-export main items
pub use alarm_driver::alarm_driver_task;
pub use clock_driver::{clock_driver_task, DEFAULT_POLL_INTERVAL};
pub use guard::TaskGuard;
