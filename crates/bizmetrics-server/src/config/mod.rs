//! Server config loader (strict YAML, then environment overrides, then validate).

pub mod env;
pub mod schema;

use std::fs;
use std::path::Path;

use bizmetrics_core::error::{Error, Result};

pub use env::apply_env_overrides;
pub use schema::{AppConfig, MetricsSection, ServerSection, SimulatorSection};

/// Names the YAML file to load instead of [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "BIZMETRICS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "bizmetrics.yaml";

/// Load the process config.
///
/// An explicit `BIZMETRICS_CONFIG` file must exist; a missing default file
/// falls back to built-in defaults. Environment overrides apply either way.
pub fn load() -> Result<AppConfig> {
    let lookup = |key: &str| std::env::var(key).ok();

    let mut cfg = match lookup(CONFIG_PATH_ENV) {
        Some(path) => parse_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => parse_file(DEFAULT_CONFIG_PATH)?,
        None => {
            tracing::debug!("no config file found, using defaults");
            AppConfig::default()
        }
    };

    apply_env_overrides(&mut cfg, lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let cfg = parse_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| Error::Internal(format!("read config {path} failed: {e}")))?;
    tracing::debug!(%path, "config file loaded");
    parse_str(&s)
}

fn parse_str(s: &str) -> Result<AppConfig> {
    serde_yaml::from_str(s).map_err(|e| Error::Config(format!("invalid yaml: {e}")))
}
