//! HTTP endpoint handlers

use std::{sync::Arc, time::Duration};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, DispatchError, PresetView, TimerInput};
use super::responses::{
    ApiResponse, DragRequest, DurationRequest, ErrorResponse, HealthResponse, StatusQuery,
    StatusResponse, TimerView,
};

type HandlerResult = Result<Json<ApiResponse>, (StatusCode, Json<ErrorResponse>)>;

/// Dispatch an input and render the snapshot it produced
async fn apply_input(state: &AppState, input: TimerInput, message: &str) -> HandlerResult {
    match state.dispatch(input).await {
        Ok(display) => Ok(Json(ApiResponse::new(message.to_string(), &display))),
        Err(DispatchError::Rejected(e)) => {
            warn!("{} rejected: {}", input.name(), e);
            Err((StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string()))))
        }
        Err(e) => {
            error!("Failed to dispatch {}: {}", input.name(), e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}

/// Handle POST /start-stop - Toggle the countdown
pub async fn start_stop_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    info!("Start-stop endpoint called");
    apply_input(&state, TimerInput::StartStop, "Countdown toggled").await
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    info!("Start endpoint called");
    apply_input(&state, TimerInput::Start, "Countdown start requested").await
}

/// Handle POST /stop - Stop the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    info!("Stop endpoint called");
    apply_input(&state, TimerInput::Stop, "Countdown stopped").await
}

/// Handle POST /preset/:index - Jump to a preset duration
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> HandlerResult {
    info!("Preset endpoint called for index {}", index);
    let message = match state.presets().get(index) {
        Some(preset) => format!("Preset {} selected", preset.label()),
        None => format!("Preset {} selected", index),
    };
    apply_input(&state, TimerInput::Preset(index), &message).await
}

/// Handle POST /duration - Set an absolute remaining time
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> HandlerResult {
    info!("Duration endpoint called with {}s", request.seconds);
    let remaining = if request.seconds.is_nan() || request.seconds <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(request.seconds).unwrap_or(Duration::MAX)
    };
    apply_input(&state, TimerInput::SetDuration(remaining), "Remaining time set").await
}

/// Handle POST /drag/begin - Pointer down on the scrubber
pub async fn drag_begin_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DragRequest>,
) -> HandlerResult {
    debug!("Drag begin at x={} of {}", request.pointer_x, request.track_width);
    apply_input(
        &state,
        TimerInput::DragBegin {
            pointer_x: request.pointer_x,
            track_width: request.track_width,
        },
        "Drag started",
    )
    .await
}

/// Handle POST /drag/move - Pointer sample while dragging
pub async fn drag_move_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DragRequest>,
) -> HandlerResult {
    debug!("Drag move to x={} of {}", request.pointer_x, request.track_width);
    apply_input(
        &state,
        TimerInput::DragMove {
            pointer_x: request.pointer_x,
            track_width: request.track_width,
        },
        "Drag updated",
    )
    .await
}

/// Handle POST /drag/end - Pointer released
pub async fn drag_end_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    debug!("Drag end");
    apply_input(&state, TimerInput::DragEnd, "Drag ended").await
}

/// Handle GET /status - Return the current timer snapshot
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Json<StatusResponse> {
    let display = state.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: TimerView::new(&display, query.track_width),
        presets: state.presets().views(&display),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /presets - List presets with their selected flag
pub async fn presets_handler(State(state): State<Arc<AppState>>) -> Json<Vec<PresetView>> {
    Json(state.preset_views())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
