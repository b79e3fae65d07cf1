//! Background traffic simulator.
//!
//! A `Simulator` owns at most one generation task at a time:
//!
//! ```text
//! Idle --start()--> Running --stop()--> Stopping --(task joined)--> Idle
//! ```
//!
//! - `start` spawns the loop on the current tokio runtime and returns at once.
//! - `stop` fires a `CancellationToken` and awaits the task's `JoinHandle`, so
//!   no metric write from this simulator happens after it returns.
//! - Misuse (`start` twice, `stop` while idle) is reported as an error and
//!   leaves the state untouched.

pub mod model;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::metrics::MetricSet;

pub use model::{Order, TickBatch, TrafficModel, UniformTraffic};

pub const DEFAULT_BASE_USERS: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub tick_interval: Duration,
    /// Fraction of `base_users` the active-user gauge swings by, in `[0, 1]`.
    pub variance: f64,
    pub base_users: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            variance: 0.5,
            base_users: DEFAULT_BASE_USERS,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(Error::Config("tick_interval must be positive".into()));
        }
        if !self.variance.is_finite() || !(0.0..=1.0).contains(&self.variance) {
            return Err(Error::Config(format!(
                "variance must be within [0, 1], got {}",
                self.variance
            )));
        }
        if self.base_users == 0 {
            return Err(Error::Config("base_users must be positive".into()));
        }
        Ok(())
    }
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Idle,
    Running,
    Stopping,
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

enum Phase {
    Idle,
    Running(Worker),
    // Entered by `stop`; only observable if a `stop` future was dropped mid-join.
    Stopping(Worker),
}

pub struct Simulator<M = UniformTraffic> {
    config: SimulatorConfig,
    metrics: Arc<MetricSet>,
    model: M,
    phase: Phase,
}

impl Simulator<UniformTraffic> {
    /// Simulator driving the uniform traffic model.
    pub fn new(config: SimulatorConfig, metrics: Arc<MetricSet>) -> Result<Self> {
        let model = UniformTraffic::new(config.base_users, config.variance);
        Self::with_model(config, metrics, model)
    }
}

impl<M> Simulator<M> {
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> SimulatorState {
        match self.phase {
            Phase::Idle => SimulatorState::Idle,
            Phase::Running(_) => SimulatorState::Running,
            Phase::Stopping(_) => SimulatorState::Stopping,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SimulatorState::Running
    }
}

impl<M: TrafficModel + Clone> Simulator<M> {
    pub fn with_model(config: SimulatorConfig, metrics: Arc<MetricSet>, model: M) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics,
            model,
            phase: Phase::Idle,
        })
    }

    /// Spawn the generation loop. Must be called from inside a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::Idle) {
            tracing::warn!(state = ?self.state(), "simulator start rejected");
            return Err(Error::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(generate(
            self.model.clone(),
            Arc::clone(&self.metrics),
            self.config.tick_interval,
            cancel.clone(),
        ));

        tracing::info!(
            interval_ms = self.config.tick_interval.as_millis() as u64,
            variance = self.config.variance,
            base_users = self.config.base_users,
            "simulator started"
        );
        self.phase = Phase::Running(Worker { cancel, handle });
        Ok(())
    }

    /// Cancel the generation loop and wait until it has fully exited.
    pub async fn stop(&mut self) -> Result<()> {
        self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {
                tracing::warn!("simulator stop rejected: not running");
                return Err(Error::NotRunning);
            }
            Phase::Running(worker) => {
                worker.cancel.cancel();
                Phase::Stopping(worker)
            }
            stopping @ Phase::Stopping(_) => stopping,
        };

        let Phase::Stopping(worker) = &mut self.phase else {
            return Err(Error::NotRunning);
        };
        let joined = (&mut worker.handle).await;
        self.phase = Phase::Idle;

        joined.map_err(|e| {
            tracing::error!(error = %e, "simulator task did not exit cleanly");
            Error::Worker(e.to_string())
        })
    }
}

impl<M> Drop for Simulator<M> {
    fn drop(&mut self) {
        if let Phase::Running(worker) | Phase::Stopping(worker) = &self.phase {
            worker.cancel.cancel();
        }
    }
}

impl<M> std::fmt::Debug for Simulator<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Wall-clock nanoseconds. Two loops started within the clock's resolution
/// get the same seed.
fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

async fn generate<M: TrafficModel>(
    model: M,
    metrics: Arc<MetricSet>,
    every: Duration,
    cancel: CancellationToken,
) {
    let seed = wall_clock_seed();
    let mut rng = SmallRng::seed_from_u64(seed);
    tracing::debug!(seed, "simulator rng seeded");

    // First tick one full interval after start.
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            _ = ticker.tick() => {
                let batch = model.next_batch(&mut rng);
                batch.apply(&metrics);
                ticks += 1;
                tracing::trace!(
                    tick = ticks,
                    orders = batch.orders.len(),
                    active_users = batch.active_users,
                    "simulated tick"
                );
            }
        }
    }

    tracing::info!(ticks, "simulator stopped");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimulatorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.base_users, 100);
    }

    #[test]
    fn invalid_configs_are_rejected_before_construction() {
        let metrics = Arc::new(MetricSet::new().unwrap());
        let bad = [
            SimulatorConfig { tick_interval: Duration::ZERO, ..Default::default() },
            SimulatorConfig { variance: -0.1, ..Default::default() },
            SimulatorConfig { variance: 1.5, ..Default::default() },
            SimulatorConfig { variance: f64::NAN, ..Default::default() },
            SimulatorConfig { base_users: 0, ..Default::default() },
        ];
        for cfg in bad {
            let err = Simulator::new(cfg, Arc::clone(&metrics)).unwrap_err();
            assert_eq!(err.code().as_str(), "CONFIG");
        }
    }

    #[test]
    fn new_simulator_is_idle() {
        let metrics = Arc::new(MetricSet::new().unwrap());
        let sim = Simulator::new(SimulatorConfig::default(), metrics).unwrap();
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert!(!sim.is_running());
    }

    #[test]
    fn seeds_follow_the_clock() {
        let a = wall_clock_seed();
        std::thread::sleep(Duration::from_millis(2));
        let b = wall_clock_seed();
        assert_ne!(a, b);
    }
}
