//! Timer engine handle
//!
//! [`TimerEngine`] is the only way into the countdown. It hands events to the
//! sequencer task over an unbounded channel and exposes the snapshots the
//! sequencer publishes. All state changes happen on the sequencer.

pub mod transition;

use std::{
    num::NonZeroU64,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    state::{TimerEvent, TimerState},
    tasks::Sequencer,
};

pub use transition::{apply, Input, Transition};

/// Snapshots a subscriber may fall behind by before it observes `Lagged`
const SNAPSHOT_CAPACITY: usize = 64;

/// Construction parameters, fixed for the lifetime of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    initial_duration_seconds: NonZeroU64,
    tick_interval: Duration,
}

impl EngineConfig {
    pub const DEFAULT_DURATION_SECONDS: u64 = 60;
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

    /// Build a config, rejecting a zero duration or a zero tick interval
    pub fn new(initial_duration_seconds: u64, tick_interval: Duration) -> Result<Self, String> {
        let initial_duration_seconds = NonZeroU64::new(initial_duration_seconds)
            .ok_or_else(|| "Initial duration must be at least one second".to_string())?;

        if tick_interval.is_zero() {
            return Err("Tick interval must be greater than zero".to_string());
        }

        Ok(Self {
            initial_duration_seconds,
            tick_interval,
        })
    }

    /// A countdown of `seconds` ticking once per second
    pub fn with_duration(seconds: u64) -> Result<Self, String> {
        Self::new(seconds, Self::DEFAULT_TICK_INTERVAL)
    }

    pub fn initial_duration_seconds(&self) -> u64 {
        self.initial_duration_seconds.get()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_duration_seconds: NonZeroU64::MIN.saturating_add(Self::DEFAULT_DURATION_SECONDS - 1),
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
        }
    }
}

/// An event queued for the sequencer, optionally waiting for the settled state
#[derive(Debug)]
pub(crate) struct Command {
    pub event: TimerEvent,
    pub ack: Option<oneshot::Sender<TimerState>>,
}

#[derive(Debug)]
struct Inner {
    config: EngineConfig,
    command_tx: mpsc::UnboundedSender<Command>,
    shutdown_tx: watch::Sender<bool>,
    shut_down: AtomicBool,
    state_rx: watch::Receiver<TimerState>,
    snapshot_tx: broadcast::Sender<TimerState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Cloneable handle to a running countdown
#[derive(Debug, Clone)]
pub struct TimerEngine {
    inner: Arc<Inner>,
}

impl TimerEngine {
    /// Start the sequencer on the current tokio runtime.
    ///
    /// Panics if called outside a runtime, like `tokio::spawn`.
    pub fn spawn(config: EngineConfig) -> Self {
        let initial = TimerState::idle(config.initial_duration_seconds());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(initial);
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CAPACITY);

        let sequencer = Sequencer::new(
            config,
            command_rx,
            shutdown_rx,
            state_tx,
            snapshot_tx.clone(),
        );
        let task = tokio::spawn(sequencer.run());

        Self {
            inner: Arc::new(Inner {
                config,
                command_tx,
                shutdown_tx,
                shut_down: AtomicBool::new(false),
                state_rx,
                snapshot_tx,
                task: Mutex::new(Some(task)),
            }),
        }
    }

    /// Queue an event without waiting. Ignored once the engine is shut down.
    pub fn dispatch(&self, event: TimerEvent) {
        self.enqueue(Command { event, ack: None });
    }

    /// Queue an event and wait for the state it settles into.
    ///
    /// Returns `None` if the engine shuts down before the event is processed.
    pub async fn submit(&self, event: TimerEvent) -> Option<TimerState> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if !self.enqueue(Command { event, ack: Some(ack_tx) }) {
            return None;
        }
        ack_rx.await.ok()
    }

    fn enqueue(&self, command: Command) -> bool {
        if self.is_shut_down() {
            debug!("Engine is shut down, dropping {} event", command.event);
            return false;
        }

        let event = command.event;
        if self.inner.command_tx.send(command).is_err() {
            debug!("Sequencer has stopped, dropping {} event", event);
            return false;
        }
        true
    }

    /// Latest settled snapshot
    pub fn current_state(&self) -> TimerState {
        *self.inner.state_rx.borrow()
    }

    /// Observe the latest settled snapshot
    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.inner.state_rx.clone()
    }

    /// Receive every snapshot from now on, in order, including the `(0, Running)`
    /// emitted when a countdown runs out
    pub fn subscribe(&self) -> broadcast::Receiver<TimerState> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn initial_duration_seconds(&self) -> u64 {
        self.inner.config.initial_duration_seconds()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }

    /// Stop the clock, discard queued events and make the engine inert.
    /// Calling it again does nothing.
    pub fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Shutting down timer engine");
        self.inner.shutdown_tx.send_replace(true);
    }

    /// Wait for the sequencer task to exit. Only the first caller waits.
    pub async fn join(&self) {
        let handle = match self.inner.task.lock() {
            Ok(mut task) => task.take(),
            Err(e) => {
                warn!("Failed to lock sequencer handle: {}", e);
                None
            }
        };

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Timer sequencer ended abnormally: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerMode;

    fn engine(seconds: u64) -> TimerEngine {
        TimerEngine::spawn(EngineConfig::with_duration(seconds).unwrap())
    }

    #[test]
    fn config_rejects_zero_values() {
        assert!(EngineConfig::with_duration(0).is_err());
        assert!(EngineConfig::new(10, Duration::ZERO).is_err());

        let config = EngineConfig::new(5, Duration::from_millis(250)).unwrap();
        assert_eq!(config.initial_duration_seconds(), 5);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn default_config_is_one_minute_of_seconds() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_duration_seconds(), 60);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_at_initial_duration() {
        let engine = engine(60);
        assert_eq!(engine.current_state(), TimerState::idle(60));
        assert_eq!(engine.initial_duration_seconds(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_returns_settled_state() {
        let engine = engine(60);
        assert_eq!(engine.submit(TimerEvent::Start).await, Some(TimerState::running(60)));
        assert_eq!(engine.submit(TimerEvent::Pause).await, Some(TimerState::paused(60)));
        assert_eq!(engine.submit(TimerEvent::Reset).await, Some(TimerState::idle(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn dispatched_events_are_processed_in_order() {
        let engine = engine(60);
        let mut snapshots = engine.subscribe();

        engine.dispatch(TimerEvent::Start);
        engine.dispatch(TimerEvent::Pause);
        engine.dispatch(TimerEvent::Start);
        engine.dispatch(TimerEvent::Reset);
        // Acknowledged only once everything before it has been evaluated
        engine.submit(TimerEvent::Reset).await;

        let mut seen = Vec::new();
        while let Ok(state) = snapshots.try_recv() {
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                TimerState::running(60),
                TimerState::paused(60),
                TimerState::running(60),
                TimerState::idle(60),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_events_do_not_notify() {
        let engine = engine(60);
        let mut snapshots = engine.subscribe();

        engine.dispatch(TimerEvent::Pause);
        engine.dispatch(TimerEvent::Reset);
        engine.submit(TimerEvent::Reset).await;

        assert!(snapshots.try_recv().is_err());
        assert_eq!(engine.current_state().mode, TimerMode::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_sees_latest_state() {
        let engine = engine(60);
        let mut watcher = engine.watch();

        engine.dispatch(TimerEvent::Start);
        watcher.changed().await.unwrap();
        assert_eq!(*watcher.borrow_and_update(), TimerState::running(60));
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_after_shutdown_is_ignored() {
        let engine = engine(60);
        engine.submit(TimerEvent::Start).await;

        engine.shutdown();
        engine.join().await;
        let frozen = engine.current_state();

        engine.dispatch(TimerEvent::Reset);
        assert_eq!(engine.submit(TimerEvent::Pause).await, None);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(engine.is_shut_down());
        assert_eq!(engine.current_state(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_is_idempotent() {
        let engine = engine(60);
        engine.shutdown();
        engine.shutdown();
        engine.join().await;
        engine.join().await;
        engine.shutdown();
        assert!(engine.is_shut_down());
    }
}
