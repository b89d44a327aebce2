//! Countdown Timer - a single start/pause/reset countdown
//! 
//! The [`engine::TimerEngine`] turns events and a once-per-second clock into a
//! stream of [`state::TimerState`] snapshots. The HTTP API and the binary are a
//! thin host around one engine instance.

pub mod config;
pub mod engine;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{EngineConfig, TimerEngine};
pub use state::{AppState, TimerEvent, TimerMode, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
