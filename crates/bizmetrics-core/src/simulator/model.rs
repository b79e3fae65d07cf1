//! Traffic models: given a random source, produce one tick's worth of
//! synthetic business events.
//!
//! Models know nothing about scheduling or cancellation; the simulator loop
//! owns the rng and decides when to ask for a batch.

use rand::Rng;

use crate::metrics::MetricSet;

/// One synthetic order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    /// Dollars.
    pub value: f64,
    /// Seconds.
    pub processing_secs: f64,
}

/// Events synthesized for a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickBatch {
    pub orders: Vec<Order>,
    pub active_users: u64,
}

impl TickBatch {
    /// Apply every event of the batch to the metric set.
    ///
    /// Per order: counter +1, one value sample, one processing-time sample.
    /// The gauge is written last.
    pub fn apply(&self, metrics: &MetricSet) {
        for order in &self.orders {
            metrics.increment_orders(1);
            metrics.observe_order_value(order.value);
            metrics.observe_processing_time(order.processing_secs);
        }
        metrics.set_active_users(self.active_users);
    }
}

/// Source of synthetic traffic.
pub trait TrafficModel: Send + 'static {
    fn next_batch<R: Rng>(&self, rng: &mut R) -> TickBatch;
}

pub const MIN_ORDERS_PER_TICK: u32 = 1;
pub const MAX_ORDERS_PER_TICK: u32 = 5;
pub const ORDER_VALUE_RANGE: std::ops::Range<f64> = 10.0..100.0;
pub const PROCESSING_SECS_RANGE: std::ops::Range<f64> = 0.1..1.6;

/// Uniform traffic: 1-5 orders per tick with uniform value and latency, and
/// an active-user count jittered around `base_users`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformTraffic {
    base_users: u64,
    variance: f64,
}

impl UniformTraffic {
    /// `variance` is the fraction of `base_users` the gauge may swing by.
    pub fn new(base_users: u64, variance: f64) -> Self {
        Self {
            base_users,
            variance,
        }
    }

    /// Half-width of the active-user window: `floor(base_users * variance)`.
    pub fn user_span(&self) -> i64 {
        (self.base_users as f64 * self.variance).floor() as i64
    }
}

impl TrafficModel for UniformTraffic {
    fn next_batch<R: Rng>(&self, rng: &mut R) -> TickBatch {
        let count = rng.random_range(MIN_ORDERS_PER_TICK..=MAX_ORDERS_PER_TICK);
        let orders = (0..count)
            .map(|_| Order {
                value: rng.random_range(ORDER_VALUE_RANGE),
                processing_secs: rng.random_range(PROCESSING_SECS_RANGE),
            })
            .collect();

        // Half-open window [-span, span). An empty window pins the gauge at base.
        let span = self.user_span();
        let offset = if span > 0 {
            rng.random_range(-span..span)
        } else {
            0
        };

        TickBatch {
            orders,
            active_users: self.base_users.saturating_add_signed(offset),
        }
    }
}
