//! bizmetrics server library entry.
//!
//! This crate wires config loading, the ops router, and the simulator
//! lifecycle around the core metric set. It is intended to be consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
pub mod server;
pub mod shutdown;
