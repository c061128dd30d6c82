//! Error types for parsing user-supplied names

use thiserror::Error;

/// Errors raised when a path segment or CLI value names nothing we know
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown phase '{0}' (expected 'presentation' or 'qa')")]
    UnknownPhase(String),

    #[error("unknown ringtone '{0}' (expected bell, alarm, digital or none)")]
    UnknownRingtone(String),
}
