//! Display helpers for countdown values

/// Remaining time under which a running countdown is flagged as a warning
pub const WARNING_THRESHOLD_SECS: u64 = 60;

/// Format seconds as `MM:SS`; minutes grow past two digits when needed
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed share of `total` as a percentage in `0.0..=100.0`
pub fn progress_percent(total: u64, remaining: u64) -> f64 {
    let total_f = total.max(1) as f64;
    let elapsed = total.saturating_sub(remaining) as f64;
    (elapsed / total_f * 100.0).clamp(0.0, 100.0)
}
