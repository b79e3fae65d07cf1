//! Process lifecycle: metric set, simulator, HTTP server, graceful shutdown.
//!
//! Shutdown order: mark draining, stop the simulator (joined), stop accepting
//! HTTP, then give in-flight requests `server.shutdown_timeout_secs`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bizmetrics_core::error::{Error, Result};
use bizmetrics_core::{MetricSet, Simulator};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{app_state::AppState, config::AppConfig, router};

/// Bind `0.0.0.0:<server.port>`.
pub async fn bind(cfg: &AppConfig) -> Result<TcpListener> {
    let addr = ("0.0.0.0", cfg.server.port);
    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("bind 0.0.0.0:{} failed: {e}", cfg.server.port)))
}

/// Serve until `shutdown` resolves, then tear everything down in order.
pub async fn run<F>(cfg: AppConfig, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let metrics = Arc::new(MetricSet::new()?);
    let mut simulator = Simulator::new(cfg.simulator_config(), Arc::clone(&metrics))?;
    let grace = Duration::from_secs(cfg.server.shutdown_timeout_secs);

    tracing::info!(environment = %cfg.environment, "starting metrics application");
    let state = AppState::new(cfg, metrics);
    let app = router::build_router(state.clone());

    match listener.local_addr() {
        Ok(addr) => tracing::info!(%addr, "http server listening"),
        Err(e) => tracing::warn!(error = %e, "listener has no local address"),
    }

    simulator.start()?;

    let stop_accepting = CancellationToken::new();
    let mut server = tokio::spawn({
        let token = stop_accepting.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
        }
    });

    tokio::select! {
        _ = shutdown => {}
        res = &mut server => {
            // Server died on its own; still join the simulator before reporting.
            let _ = simulator.stop().await;
            return match res {
                Ok(Ok(())) => Err(Error::Internal("http server exited unexpectedly".into())),
                Ok(Err(e)) => Err(Error::Internal(format!("http server error: {e}"))),
                Err(e) => Err(Error::Internal(format!("http server task failed: {e}"))),
            };
        }
    }

    tracing::info!("shutting down");
    state.set_draining();
    let stopped = simulator.stop().await;
    stop_accepting.cancel();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => tracing::info!("server exited gracefully"),
        Ok(Ok(Err(e))) => return Err(Error::Internal(format!("http server error: {e}"))),
        Ok(Err(e)) => return Err(Error::Internal(format!("http server task failed: {e}"))),
        Err(_) => {
            tracing::warn!(grace_secs = grace.as_secs(), "server forced to shutdown");
            server.abort();
            return Err(Error::Internal("graceful shutdown timed out".into()));
        }
    }

    stopped
}
