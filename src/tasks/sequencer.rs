//! Countdown sequencer background task
//!
//! One task owns the current state, the command queue and the clock, so no two
//! transitions are ever evaluated at the same time. The clock only exists while
//! the countdown is running: it is created on every entry into `Running` and
//! dropped on every exit, which is what keeps a tick that was due before a reset
//! from landing on the next countdown.

use tokio::{
    sync::{broadcast, mpsc, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    engine::{apply, Command, EngineConfig, Input},
    state::{TimerMode, TimerState},
};

pub(crate) struct Sequencer {
    config: EngineConfig,
    state: TimerState,
    clock: Option<Interval>,
    command_rx: mpsc::UnboundedReceiver<Command>,
    shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<TimerState>,
    snapshot_tx: broadcast::Sender<TimerState>,
}

impl Sequencer {
    pub(crate) fn new(
        config: EngineConfig,
        command_rx: mpsc::UnboundedReceiver<Command>,
        shutdown_rx: watch::Receiver<bool>,
        state_tx: watch::Sender<TimerState>,
        snapshot_tx: broadcast::Sender<TimerState>,
    ) -> Self {
        Self {
            config,
            state: TimerState::idle(config.initial_duration_seconds()),
            clock: None,
            command_rx,
            shutdown_rx,
            state_tx,
            snapshot_tx,
        }
    }

    pub(crate) async fn run(mut self) {
        info!(
            "Starting timer sequencer: {}s countdown, tick every {:?}",
            self.config.initial_duration_seconds(),
            self.config.tick_interval()
        );

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }

                command = self.command_rx.recv() => match command {
                    Some(Command { event, ack }) => {
                        let settled = self.evaluate(Input::Event(event));
                        if let Some(ack) = ack {
                            if ack.send(settled).is_err() {
                                debug!("Submitter of {} event went away", event);
                            }
                        }
                    }
                    None => {
                        debug!("All engine handles dropped");
                        break;
                    }
                },

                _ = next_tick(&mut self.clock) => {
                    self.evaluate(Input::Tick);
                }
            }
        }

        // Anything still queued is discarded along with the receiver
        self.clock = None;
        self.command_rx.close();
        info!("Timer sequencer stopped at {}", self.state);
    }

    /// Run one input through the state machine and publish the outcome
    fn evaluate(&mut self, input: Input) -> TimerState {
        let previous = self.state;
        let transition = apply(previous, input, self.config.initial_duration_seconds());

        if transition.is_noop(&previous) {
            debug!("Ignoring {:?} while {}", input, previous.mode);
            return previous;
        }

        if let Some(expired) = transition.expired {
            let _ = self.snapshot_tx.send(expired);
            info!(
                "Countdown finished, resetting to {}s",
                self.config.initial_duration_seconds()
            );
        }

        self.state = transition.next;
        self.sync_clock(previous.mode);

        match input {
            Input::Tick if transition.expired.is_none() => debug!("Tick: {}", self.state),
            _ => info!("{} -> {}", previous, self.state),
        }

        self.state_tx.send_replace(self.state);
        // No subscribers is fine
        let _ = self.snapshot_tx.send(self.state);

        self.state
    }

    fn sync_clock(&mut self, previous: TimerMode) {
        match (previous, self.state.mode) {
            (TimerMode::Running, TimerMode::Running) => {}
            (_, TimerMode::Running) => {
                let period = self.config.tick_interval();
                let mut clock = interval_at(Instant::now() + period, period);
                clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.clock = Some(clock);
                debug!("Clock armed");
            }
            (_, _) => {
                if self.clock.take().is_some() {
                    debug!("Clock disarmed");
                }
            }
        }
    }
}

/// Resolve on the next clock tick, or never while the clock is disarmed
async fn next_tick(clock: &mut Option<Interval>) {
    match clock {
        Some(clock) => {
            clock.tick().await;
        }
        None => std::future::pending().await,
    }
}
