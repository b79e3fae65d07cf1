#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use bizmetrics_core::MetricSet;
use bizmetrics_server::{app_state::AppState, config, router::build_router};
use tower::ServiceExt;

fn state(yaml: &str) -> AppState {
    let cfg = config::load_from_str(yaml).expect("config");
    AppState::new(cfg, Arc::new(MetricSet::new().expect("metrics")))
}

async fn get(app: Router, path: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn health_responds_ok() {
    let (status, body) = get(build_router(state("version: 1\n")), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn root_names_environment_and_metrics_path() {
    let app = build_router(state("version: 1\nenvironment: production\nmetrics: { path: /prom }\n"));
    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Metrics App - production Environment\nCheck /prom for Prometheus metrics\n"
    );
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let (status, _) = get(build_router(state("version: 1\n")), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn readyz_flips_when_draining() {
    let st = state("version: 1\n");
    let (status, body) = get(build_router(st.clone()), "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");

    st.set_draining();
    let (status, body) = get(build_router(st), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "draining");
}

#[tokio::test]
async fn metrics_renders_current_values() {
    let st = state("version: 1\n");
    let metrics = st.metrics();
    metrics.increment_orders(4);
    metrics.observe_order_value(55.0);
    metrics.observe_processing_time(0.7);
    metrics.set_active_users(123);

    let response = build_router(st)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("business_orders_processed_total 4"));
    assert!(body.contains("business_order_value_dollars_count 1"));
    assert!(body.contains("business_order_processing_seconds_count 1"));
    assert!(body.contains("business_active_users 123"));
}

#[tokio::test]
async fn metrics_path_is_configurable() {
    let app = build_router(state("version: 1\nmetrics: { path: /internal/prom }\n"));
    let (status, body) = get(app.clone(), "/internal/prom").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("# TYPE business_orders_processed_total counter"));

    let (status, _) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disabled_metrics_are_not_routed() {
    let app = build_router(state("version: 1\nmetrics: { enabled: false }\n"));
    let (status, _) = get(app.clone(), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}
