use std::time::Duration;

use bizmetrics_core::error::{Error, Result};
use bizmetrics_core::SimulatorConfig;
use serde::Deserialize;

pub const ENV_DEVELOPMENT: &str = "development";
pub const ENV_PRODUCTION: &str = "production";

/// Paths owned by the ops router; the metrics endpoint may not shadow them.
const RESERVED_PATHS: [&str; 3] = ["/", "/health", "/readyz"];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub simulator: SimulatorSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            environment: default_environment(),
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            simulator: SimulatorSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!("unsupported config version: {}", self.version)));
        }
        if self.environment.trim().is_empty() {
            return Err(Error::Config("environment must not be empty".into()));
        }

        self.server.validate()?;
        self.metrics.validate()?;
        self.simulator.validate()?;

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == ENV_DEVELOPMENT
    }

    pub fn is_production(&self) -> bool {
        self.environment == ENV_PRODUCTION
    }

    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            tick_interval: Duration::from_secs(self.simulator.interval_secs),
            variance: self.simulator.variance,
            base_users: self.simulator.base_users,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("server.port must be non-zero".into()));
        }
        if !(1..=300).contains(&self.shutdown_timeout_secs) {
            return Err(Error::Config(
                "server.shutdown_timeout_secs must be between 1 and 300".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,

    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            path: default_metrics_path(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(Error::Config("metrics.path must start with '/'".into()));
        }
        if RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(Error::Config(format!(
                "metrics.path {} collides with a built-in route",
                self.path
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_variance")]
    pub variance: f64,

    #[serde(default = "default_base_users")]
    pub base_users: u64,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            variance: default_variance(),
            base_users: default_base_users(),
        }
    }
}

impl SimulatorSection {
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::Config("simulator.interval_secs must be at least 1".into()));
        }
        if !self.variance.is_finite() || !(0.0..=1.0).contains(&self.variance) {
            return Err(Error::Config("simulator.variance must be between 0 and 1".into()));
        }
        if self.base_users == 0 {
            return Err(Error::Config("simulator.base_users must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_environment() -> String {
    ENV_DEVELOPMENT.into()
}
fn default_port() -> u16 {
    8080
}
fn default_shutdown_timeout_secs() -> u64 {
    10
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_interval_secs() -> u64 {
    5
}
fn default_variance() -> f64 {
    0.5
}
fn default_base_users() -> u64 {
    bizmetrics_core::simulator::DEFAULT_BASE_USERS
}
