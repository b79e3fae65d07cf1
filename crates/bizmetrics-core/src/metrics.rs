//! Business metric set backed by a `prometheus::Registry`.
//!
//! The set owns its registry instead of using the crate-global default one,
//! so every owner (server, tests) gets an isolated view. Each instrument
//! synchronizes internally; no lock ever spans two instruments.

use prometheus::{
    exponential_buckets, linear_buckets, Encoder, Gauge, Histogram, HistogramOpts, IntCounter,
    Registry, TextEncoder,
};

use crate::error::{Error, Result};

pub const ORDERS_PROCESSED: &str = "business_orders_processed_total";
pub const ORDER_VALUE: &str = "business_order_value_dollars";
pub const ORDER_PROCESSING_TIME: &str = "business_order_processing_seconds";
pub const ACTIVE_USERS: &str = "business_active_users";

/// Counter, two histograms and a gauge, updated together by the simulator and
/// read by the scrape handler.
#[derive(Clone)]
pub struct MetricSet {
    registry: Registry,
    orders_processed: IntCounter,
    order_value: Histogram,
    order_processing_time: Histogram,
    active_users: Gauge,
}

/// Point-in-time copy of the instrument values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSnapshot {
    pub orders_processed: u64,
    pub order_value_count: u64,
    pub order_value_sum: f64,
    pub processing_time_count: u64,
    pub processing_time_sum: f64,
    pub active_users: f64,
}

impl MetricSet {
    /// Build the four instruments and register them in a fresh registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let orders_processed =
            IntCounter::new(ORDERS_PROCESSED, "The total number of processed orders")?;

        // 10..=100 in steps of 10
        let order_value = Histogram::with_opts(
            HistogramOpts::new(ORDER_VALUE, "The value of orders in dollars")
                .buckets(linear_buckets(10.0, 10.0, 10)?),
        )?;

        // 0.1, 0.2, 0.4, 0.8, 1.6
        let order_processing_time = Histogram::with_opts(
            HistogramOpts::new(ORDER_PROCESSING_TIME, "Time taken to process orders")
                .buckets(exponential_buckets(0.1, 2.0, 5)?),
        )?;

        let active_users = Gauge::new(ACTIVE_USERS, "The current number of active users")?;

        registry.register(Box::new(orders_processed.clone()))?;
        registry.register(Box::new(order_value.clone()))?;
        registry.register(Box::new(order_processing_time.clone()))?;
        registry.register(Box::new(active_users.clone()))?;

        Ok(Self {
            registry,
            orders_processed,
            order_value,
            order_processing_time,
            active_users,
        })
    }

    pub fn increment_orders(&self, n: u64) {
        self.orders_processed.inc_by(n);
    }

    /// Record one order value in dollars.
    pub fn observe_order_value(&self, value: f64) {
        self.order_value.observe(value);
    }

    /// Record one order processing time in seconds.
    pub fn observe_processing_time(&self, secs: f64) {
        self.order_processing_time.observe(secs);
    }

    pub fn set_active_users(&self, users: u64) {
        self.active_users.set(users as f64);
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Registry(format!("non-utf8 exposition: {e}")))
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            orders_processed: self.orders_processed.get(),
            order_value_count: self.order_value.get_sample_count(),
            order_value_sum: self.order_value.get_sample_sum(),
            processing_time_count: self.order_processing_time.get_sample_count(),
            processing_time_sum: self.order_processing_time.get_sample_sum(),
            active_users: self.active_users.get(),
        }
    }
}

impl std::fmt::Debug for MetricSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricSet")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
