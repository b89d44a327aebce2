//! Background tasks module
//! 
//! This module contains the countdown sequencer and the tasks that observe it.

pub mod sequencer;
pub mod state_log;

pub(crate) use sequencer::Sequencer;
pub use state_log::state_log_task;
