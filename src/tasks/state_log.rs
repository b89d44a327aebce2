//! Snapshot logging background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::state::TimerState;

/// Background task that logs every snapshot the engine emits
pub async fn state_log_task(mut snapshots: broadcast::Receiver<TimerState>) {
    debug!("Starting state log task");

    loop {
        match snapshots.recv().await {
            Ok(state) => debug!("State: {}", state),
            Err(RecvError::Lagged(skipped)) => {
                warn!("State log fell behind, skipped {} snapshots", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Snapshot stream closed, stopping state log task");
                break;
            }
        }
    }
}
