//! Application state shared by the HTTP handlers

use std::{sync::Mutex, time::Instant};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{TimerEvent, TimerState};
use crate::engine::TimerEngine;

/// Host-side state: the one engine this process owns plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// The countdown engine
    pub engine: TimerEngine,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last accepted event and when it was accepted
    last_action: Mutex<Option<(TimerEvent, DateTime<Utc>)>>,
}

impl AppState {
    pub fn new(engine: TimerEngine, port: u16, host: String) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    /// Forward an event to the engine and wait for the resulting state
    pub async fn send_event(&self, event: TimerEvent) -> Result<TimerState, String> {
        let state = self
            .engine
            .submit(event)
            .await
            .ok_or_else(|| format!("Timer engine is shut down, {} ignored", event))?;

        info!("{} event settled at {}", event, state);
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some((event, Utc::now())),
            Err(e) => warn!("Failed to record last action: {}", e),
        }

        Ok(state)
    }

    /// Latest settled timer state
    pub fn timer_state(&self) -> TimerState {
        self.engine.current_state()
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<TimerEvent>, Option<DateTime<Utc>>) {
        match self.last_action.lock() {
            Ok(last_action) => match *last_action {
                Some((event, at)) => (Some(event), Some(at)),
                None => (None, None),
            },
            Err(_) => (None, None),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
