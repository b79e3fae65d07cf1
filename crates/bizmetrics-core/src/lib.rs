//! bizmetrics core: the business metric set and the traffic simulator that
//! keeps it moving.
//!
//! This crate carries no HTTP or configuration-file dependencies. The server
//! crate owns transport and config, then hands an `Arc<MetricSet>` to both the
//! simulator and the scrape handler.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Lifecycle misuse of the simulator surfaces as `Error`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod simulator;

/// Shared result type.
pub use error::{Error, ErrorCode, Result};
pub use metrics::{MetricSet, MetricSnapshot};
pub use simulator::{Simulator, SimulatorConfig, SimulatorState};
