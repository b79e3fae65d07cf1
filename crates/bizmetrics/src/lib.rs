//! Top-level facade crate for bizmetrics.
//!
//! Re-exports the core metric set/simulator and the server library so users can depend on a single crate.

pub mod core {
    pub use bizmetrics_core::*;
}

pub mod server {
    pub use bizmetrics_server::*;
}
