//! State management module
//! 
//! This module contains the timer snapshot types and the state shared by the
//! HTTP handlers.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{TimerEvent, TimerMode, TimerState};
