//! Timer snapshot, mode and event types

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Run mode of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Idle,
    Running,
    Paused,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Idle => "idle",
            TimerMode::Running => "running",
            TimerMode::Paused => "paused",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the countdown at one point in logical time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub mode: TimerMode,
}

impl TimerState {
    /// The reset state for a countdown of `initial_seconds`
    pub fn idle(initial_seconds: u64) -> Self {
        Self {
            remaining_seconds: initial_seconds,
            mode: TimerMode::Idle,
        }
    }

    pub fn running(remaining_seconds: u64) -> Self {
        Self {
            remaining_seconds,
            mode: TimerMode::Running,
        }
    }

    pub fn paused(remaining_seconds: u64) -> Self {
        Self {
            remaining_seconds,
            mode: TimerMode::Paused,
        }
    }

    /// Check if the countdown is ticking
    pub fn is_running(&self) -> bool {
        self.mode == TimerMode::Running
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}s, {})", self.remaining_seconds, self.mode)
    }
}

/// User-issued input to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerEvent {
    Start,
    Pause,
    Reset,
}

impl TimerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerEvent::Start => "start",
            TimerEvent::Pause => "pause",
            TimerEvent::Reset => "reset",
        }
    }
}

impl fmt::Display for TimerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(TimerEvent::Start),
            "pause" => Ok(TimerEvent::Pause),
            "reset" => Ok(TimerEvent::Reset),
            other => Err(format!("Unknown timer event: {}", other)),
        }
    }
}
