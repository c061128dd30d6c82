//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::Ringtone;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "stage-timer")]
#[command(about = "Dual countdown timer server for a presentation and its Q&A")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Presentation timer duration in minutes
    #[arg(long, default_value = "15")]
    pub presentation_minutes: u64,

    /// Q&A timer duration in minutes
    #[arg(long, default_value = "5")]
    pub qa_minutes: u64,

    /// Initial ringtone for both timers (bell, alarm, digital, none)
    #[arg(short, long, default_value = "bell")]
    pub ringtone: Ringtone,

    /// Clock driver polling interval in milliseconds
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub poll_ms: u64,

    /// Command invoked as `<player> <tone>` to play tones; the terminal bell is used otherwise
    #[arg(long)]
    pub player: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn presentation_seconds(&self) -> u64 {
        self.presentation_minutes.saturating_mul(60)
    }

    pub fn qa_seconds(&self) -> u64 {
        self.qa_minutes.saturating_mul(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fifteen_plus_five_session() {
        let config = Config::try_parse_from(["stage-timer"]).unwrap();
        assert_eq!(config.presentation_seconds(), 900);
        assert_eq!(config.qa_seconds(), 300);
        assert_eq!(config.ringtone, Ringtone::Bell);
        assert_eq!(config.poll_interval(), Duration::from_millis(200));
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
        assert!(config.player.is_none());
    }

    #[test]
    fn parses_ringtone_and_rejects_unknown() {
        let config =
            Config::try_parse_from(["stage-timer", "--ringtone", "digital", "-v"]).unwrap();
        assert_eq!(config.ringtone, Ringtone::Digital);
        assert_eq!(config.log_level(), "debug");

        assert!(Config::try_parse_from(["stage-timer", "--ringtone", "gong"]).is_err());
        assert!(Config::try_parse_from(["stage-timer", "--poll-ms", "0"]).is_err());
    }
}
