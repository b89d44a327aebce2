//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TimerEvent, TimerMode, TimerState};

/// Response to an event endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Mode the timer settled into
    pub status: TimerMode,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    pub fn new(event: TimerEvent, timer: TimerState) -> Self {
        Self {
            status: timer.mode,
            message: format!("{} accepted, timer is {}", event, timer.mode),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Which controls a client should offer for the current mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub reset: bool,
    /// Label for the start control ("Resume" while paused)
    pub start_label: String,
}

impl Controls {
    pub fn for_mode(mode: TimerMode) -> Self {
        let (start, pause, reset) = match mode {
            TimerMode::Idle => (true, false, false),
            TimerMode::Running => (false, true, true),
            TimerMode::Paused => (true, false, true),
        };
        let start_label = if mode == TimerMode::Paused { "Resume" } else { "Start" };

        Self {
            start,
            pause,
            reset,
            start_label: start_label.to_string(),
        }
    }
}

/// Status response with display helpers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    /// Remaining time as `mm:ss`
    pub display: String,
    pub controls: Controls,
    pub initial_duration_seconds: u64,
    pub uptime_seconds: u64,
    pub last_action: Option<TimerEvent>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Format seconds as `mm:ss`. Minutes are not wrapped into hours.
pub fn format_display(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_minutes_and_seconds() {
        assert_eq!(format_display(60), "01:00");
        assert_eq!(format_display(55), "00:55");
        assert_eq!(format_display(0), "00:00");
        assert_eq!(format_display(3725), "62:05");
    }

    #[test]
    fn controls_follow_mode() {
        let idle = Controls::for_mode(TimerMode::Idle);
        assert!(idle.start && !idle.pause && !idle.reset);
        assert_eq!(idle.start_label, "Start");

        let running = Controls::for_mode(TimerMode::Running);
        assert!(!running.start && running.pause && running.reset);

        let paused = Controls::for_mode(TimerMode::Paused);
        assert!(paused.start && !paused.pause && paused.reset);
        assert_eq!(paused.start_label, "Resume");
    }
}
