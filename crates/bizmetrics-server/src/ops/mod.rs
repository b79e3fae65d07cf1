//! Operational HTTP endpoints.
//!
//! - `/`        : banner naming the environment and the metrics path
//! - `/health`  : liveness
//! - `/readyz`  : readiness (503 when draining)
//! - `<path>`   : Prometheus text format (path from `metrics.path`)

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let cfg = state.cfg();
    format!(
        "Metrics App - {} Environment\nCheck {} for Prometheus metrics\n",
        cfg.environment, cfg.metrics.path
    )
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics().render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "metrics render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
