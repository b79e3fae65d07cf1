//! Environment-variable overrides.
//!
//! Keys keep the names operators already use for this service. A key that is
//! present but unparsable is a config error naming the key.

use std::str::FromStr;

use bizmetrics_core::error::{Error, Result};

use super::schema::AppConfig;

pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const SERVER_PORT: &str = "SERVER_PORT";
pub const METRICS_ENABLED: &str = "METRICS_ENABLED";
pub const METRICS_PATH: &str = "METRICS_PATH";
pub const METRICS_INTERVAL: &str = "METRICS_INTERVAL";
pub const METRICS_VARIANCE: &str = "METRICS_VARIANCE";

/// Overlay environment values onto `cfg`. `lookup` is `std::env::var` in
/// production and a map in tests.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENVIRONMENT) {
        cfg.environment = v;
    }
    if let Some(v) = lookup(SERVER_PORT) {
        cfg.server.port = parse(SERVER_PORT, &v)?;
    }
    if let Some(v) = lookup(METRICS_ENABLED) {
        cfg.metrics.enabled = parse_bool(&v).ok_or_else(|| invalid(METRICS_ENABLED, &v))?;
    }
    if let Some(v) = lookup(METRICS_PATH) {
        cfg.metrics.path = v;
    }
    if let Some(v) = lookup(METRICS_INTERVAL) {
        cfg.simulator.interval_secs = parse(METRICS_INTERVAL, &v)?;
    }
    if let Some(v) = lookup(METRICS_VARIANCE) {
        cfg.simulator.variance = parse(METRICS_VARIANCE, &v)?;
    }
    Ok(())
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, raw: &str) -> Error {
    Error::Config(format!("{key}: cannot parse {raw:?}"))
}

// 1/0, t/f and true/false in lower, upper or title case.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
