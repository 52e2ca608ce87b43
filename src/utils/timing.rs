// src/utils/timing.rs

//! Request duration measurements.

use std::time::Duration;

/// Duration of bestseller API page requests.
pub const BESTSELLERS_API_CALL_DURATION: &str = "bestsellers.api.call.duration";

/// Duration of ISBN lookup API requests.
pub const PUBLICATIONS_API_CALL_DURATION: &str = "publications.api.call.duration";

/// Receives one measurement per outbound request attempt.
pub trait TimingSink: Send + Sync {
    fn record(&self, name: &'static str, elapsed: Duration);
}

/// Emits measurements as `metrics` histograms, in milliseconds.
///
/// Without an installed recorder the measurements are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsTimingSink;

impl TimingSink for MetricsTimingSink {
    fn record(&self, name: &'static str, elapsed: Duration) {
        metrics::histogram!(name).record(elapsed.as_secs_f64() * 1000.0);
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingSink;
