//! Axum router wiring.
//!
//! The metrics route is mounted only when `metrics.enabled`; any path not
//! listed here is a 404.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(ops::root))
        .route("/health", get(ops::health))
        .route("/readyz", get(ops::readyz));

    if state.cfg().metrics.enabled {
        let path = state.cfg().metrics.path.clone();
        tracing::info!(%path, "metrics endpoint enabled");
        router = router.route(&path, get(ops::metrics));
    }

    router.with_state(state)
}
