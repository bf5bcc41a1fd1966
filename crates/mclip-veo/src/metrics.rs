//! Veo metrics.

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Veo API requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "veo_requests_total";

    /// Status queries issued while waiting on an operation.
    pub const POLLS_TOTAL: &str = "veo_polls_total";

    /// Wall-clock time from submit to a finished operation.
    pub const GENERATION_SECONDS: &str = "veo_generation_seconds";
}

pub fn record_request(operation: &str, status: u16) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_poll(outcome: &'static str) {
    counter!(names::POLLS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_generation(seconds: f64, outcome: &'static str) {
    histogram!(names::GENERATION_SECONDS, "outcome" => outcome).record(seconds);
}
