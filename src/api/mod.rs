//! HTTP API module
//!
//! The presentation layer: every user intent arrives here and is queued
//! for the timer loop.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start-stop", post(start_stop_handler))
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/preset/:index", post(preset_handler))
        .route("/duration", post(duration_handler))
        .route("/drag/begin", post(drag_begin_handler))
        .route("/drag/move", post(drag_move_handler))
        .route("/drag/end", post(drag_end_handler))
        .route("/status", get(status_handler))
        .route("/presets", get(presets_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        services::TerminalBellPlayer,
        state::{PositiveDuration, PresetSelector, TimerCore},
        tasks::spawn_timer_loop,
    };

    fn app() -> Router {
        let presets = PresetSelector::default();
        let core = TimerCore::new(
            PositiveDuration::from_secs(5400).unwrap(),
            presets.clone(),
            Duration::from_secs(1),
        );
        let timer = spawn_timer_loop(core, Arc::new(TerminalBellPlayer));
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), presets, &timer));
        create_router(state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn preset_selects_and_reports() {
        let app = app();
        let (status, body) = call(&app, Method::POST, "/preset/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["remaining_seconds"], 600.0);
        assert_eq!(body["timer"]["total_seconds"], 5400.0);
        assert_eq!(body["timer"]["display"], "10:00");

        let (_, body) = call(&app, Method::GET, "/status?track_width=300", None).await;
        assert_eq!(body["presets"][1]["selected"], true);
        assert_eq!(body["presets"][0]["selected"], false);
        assert_eq!(body["last_action"], "preset");
        let x = body["timer"]["scrubber_x"].as_f64().unwrap();
        assert!((x - 600.0 / 5400.0 * 300.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_preset_is_not_found() {
        let app = app();
        let (status, body) = call(&app, Method::POST, "/preset/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test(start_paused = true)]
    async fn drag_and_count_down() {
        let app = app();
        let (_, body) = call(
            &app,
            Method::POST,
            "/drag/begin",
            Some(json!({ "pointer_x": 100.0, "track_width": 400.0 })),
        )
        .await;
        assert_eq!(body["timer"]["remaining_seconds"], 1350.0);

        call(&app, Method::POST, "/drag/end", None).await;
        let (_, body) = call(&app, Method::POST, "/start-stop", None).await;
        assert_eq!(body["status"], "running");

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let (_, body) = call(&app, Method::GET, "/status", None).await;
        assert_eq!(body["timer"]["remaining_seconds"], 1347.0);
        assert!(body["timer"].get("scrubber_x").is_none());

        let (_, body) = call(&app, Method::POST, "/start-stop", None).await;
        assert_eq!(body["status"], "idle");
    }

    #[tokio::test(start_paused = true)]
    async fn duration_is_clamped() {
        let app = app();
        let (_, body) = call(&app, Method::POST, "/duration", Some(json!({ "seconds": 99999.0 }))).await;
        assert_eq!(body["timer"]["remaining_seconds"], 5400.0);

        let (_, body) = call(&app, Method::POST, "/duration", Some(json!({ "seconds": -5.0 }))).await;
        assert_eq!(body["timer"]["remaining_seconds"], 0.0);

        let (_, body) = call(&app, Method::POST, "/start", None).await;
        assert_eq!(body["timer"]["is_running"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn health_and_presets() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (_, body) = call(&app, Method::GET, "/presets", None).await;
        let labels: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["label"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["5m", "10m", "25m"]);
    }
}
