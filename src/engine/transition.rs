//! Pure countdown state machine
//!
//! Every (state, input) pair has a defined outcome. The sequencer feeds inputs
//! through [`apply`] one at a time and publishes whatever comes out.

use crate::state::{TimerEvent, TimerMode, TimerState};

/// Something the sequencer evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Event(TimerEvent),
    Tick,
}

/// Outcome of a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The `(0, Running)` snapshot emitted when a tick runs the countdown out
    pub expired: Option<TimerState>,
    /// State after the evaluation has settled
    pub next: TimerState,
}

impl Transition {
    fn settle(next: TimerState) -> Self {
        Self { expired: None, next }
    }

    /// True if the evaluation left the state untouched
    pub fn is_noop(&self, previous: &TimerState) -> bool {
        self.expired.is_none() && self.next == *previous
    }
}

/// Evaluate one input against `state`
pub fn apply(state: TimerState, input: Input, initial_seconds: u64) -> Transition {
    use TimerMode::*;

    match (state.mode, input) {
        (Idle | Paused, Input::Event(TimerEvent::Start)) => {
            Transition::settle(TimerState::running(state.remaining_seconds))
        }
        (Running, Input::Event(TimerEvent::Pause)) => {
            Transition::settle(TimerState::paused(state.remaining_seconds))
        }
        (Running | Paused, Input::Event(TimerEvent::Reset)) => {
            Transition::settle(TimerState::idle(initial_seconds))
        }
        (Running, Input::Tick) => {
            let remaining = state.remaining_seconds.saturating_sub(1);
            if remaining == 0 {
                Transition {
                    expired: Some(TimerState::running(0)),
                    next: TimerState::idle(initial_seconds),
                }
            } else {
                Transition::settle(TimerState::running(remaining))
            }
        }
        // Start while running, pause outside running, reset while idle, and
        // ticks that arrive without a running countdown.
        _ => Transition::settle(state),
    }
}
