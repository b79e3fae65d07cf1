//! bizmetrics server
//!
//! - Prometheus scrape endpoint (default `/metrics`)
//! - `/health`, `/readyz`, `/` banner
//! - Background simulator feeding synthetic business metrics
//! - Graceful shutdown on SIGINT/SIGTERM

use tracing_subscriber::{fmt, EnvFilter};

use bizmetrics_core::error::Result;
use bizmetrics_server::{config, server, shutdown};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "bizmetrics-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load()?;
    let listener = server::bind(&cfg).await?;
    server::run(cfg, listener, shutdown::shutdown_signal()).await
}
