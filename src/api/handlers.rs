//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::state::{AppState, TimerEvent};
use super::responses::{format_display, ApiResponse, Controls, HealthResponse, StatusResponse};

/// Forward an event and answer with the state it settled into
async fn forward_event(state: &AppState, event: TimerEvent) -> Result<Json<ApiResponse>, StatusCode> {
    match state.send_event(event).await {
        Ok(timer) => Ok(Json(ApiResponse::new(event, timer))),
        Err(e) => {
            warn!("{}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    forward_event(&state, TimerEvent::Start).await
}

/// Handle POST /pause - Hold the countdown at its current value
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    forward_event(&state, TimerEvent::Pause).await
}

/// Handle POST /reset - Return to the initial duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    forward_event(&state, TimerEvent::Reset).await
}

/// Handle POST /event/:event - Forward an event by name
pub async fn event_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let event = name.parse::<TimerEvent>().map_err(|e| {
        info!("Rejected event request: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    forward_event(&state, event).await
}

/// Handle GET /status - Return the latest timer state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.timer_state();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer,
        display: format_display(timer.remaining_seconds),
        controls: Controls::for_mode(timer.mode),
        initial_duration_seconds: state.engine.initial_duration_seconds(),
        uptime_seconds: state.uptime_seconds(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
