pub mod mean;

pub use mean::{mean, Mean, MeanValue};

/// Name of the per-record field that carries one run's average latency.
pub const LATENCY_FIELD: &str = "AverageLatency";
