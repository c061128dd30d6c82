//! Timer snapshot types shared by the engine, the handle and the API

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Lifecycle status of a single countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Audible end signal played when a countdown completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ringtone {
    #[default]
    Bell,
    Alarm,
    Digital,
    None,
}

impl Ringtone {
    pub const ALL: [Ringtone; 4] = [
        Ringtone::Bell,
        Ringtone::Alarm,
        Ringtone::Digital,
        Ringtone::None,
    ];

    /// Interval between repeated tones while ringing, `None` for a silent ringtone
    pub fn cadence(self) -> Option<Duration> {
        match self {
            Ringtone::Bell => Some(Duration::from_millis(2000)),
            Ringtone::Alarm => Some(Duration::from_millis(800)),
            Ringtone::Digital => Some(Duration::from_millis(1000)),
            Ringtone::None => None,
        }
    }

    pub fn is_silent(self) -> bool {
        self == Ringtone::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ringtone::Bell => "bell",
            Ringtone::Alarm => "alarm",
            Ringtone::Digital => "digital",
            Ringtone::None => "none",
        }
    }
}

impl fmt::Display for Ringtone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ringtone {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bell" => Ok(Ringtone::Bell),
            "alarm" => Ok(Ringtone::Alarm),
            "digital" => Ok(Ringtone::Digital),
            "none" => Ok(Ringtone::None),
            _ => Err(ParseError::UnknownRingtone(s.to_string())),
        }
    }
}

/// Which half of the session a timer measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Presentation,
    Qa,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Presentation, Phase::Qa];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Presentation => "presentation",
            Phase::Qa => "qa",
        }
    }

    /// Human-facing title shown by hosts
    pub fn title(self) -> &'static str {
        match self {
            Phase::Presentation => "Presentation",
            Phase::Qa => "Q&A",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "presentation" | "ppt" => Ok(Phase::Presentation),
            "qa" | "q&a" => Ok(Phase::Qa),
            _ => Err(ParseError::UnknownPhase(s.to_string())),
        }
    }
}

/// Read-only view of an engine that hosts re-render from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining: u64,
    pub duration: u64,
    pub status: TimerStatus,
    pub ringtone: Ringtone,
    pub is_ringing: bool,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ringtone_cadence_matches_tone() {
        assert_eq!(Ringtone::Bell.cadence(), Some(Duration::from_millis(2000)));
        assert_eq!(Ringtone::Alarm.cadence(), Some(Duration::from_millis(800)));
        assert_eq!(Ringtone::Digital.cadence(), Some(Duration::from_millis(1000)));
        assert_eq!(Ringtone::None.cadence(), None);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Digital".parse::<Ringtone>(), Ok(Ringtone::Digital));
        assert_eq!("PPT".parse::<Phase>(), Ok(Phase::Presentation));
        assert_eq!("qa".parse::<Phase>(), Ok(Phase::Qa));
        assert_eq!(
            "chime".parse::<Ringtone>(),
            Err(ParseError::UnknownRingtone("chime".to_string()))
        );
        assert!("keynote".parse::<Phase>().is_err());
    }

    #[test]
    fn snapshot_serializes_lowercase_enums() {
        let snapshot = TimerSnapshot {
            phase: Phase::Qa,
            remaining: 42,
            duration: 300,
            status: TimerStatus::Paused,
            ringtone: Ringtone::None,
            is_ringing: false,
        };
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["phase"], "qa");
        assert_eq!(json["status"], "paused");
        assert_eq!(json["ringtone"], "none");
        assert_eq!(json["remaining"], 42);
    }
}
