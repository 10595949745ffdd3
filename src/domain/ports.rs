//! Domain Ports
//!
//! The notification seam between the metrics collector and anything that
//! reacts to metric updates (alerting, logging, exposition).
//!
//! ```text
//! MetricsCollector::record ──▶ [subscriber 1] ──▶ [subscriber 2] ──▶ ...
//!                             (attachment order, synchronous)
//! ```

use crate::monitoring::ServiceMetrics;

/// Receives a "metrics updated" notification after every successful record.
///
/// Subscribers run synchronously on the recording thread, in the order they
/// were attached, and receive the service's metrics as they stand right after
/// the update.
pub trait MetricsSubscriber {
    /// Called once per recorded response.
    fn on_metrics_updated(&self, metrics: &ServiceMetrics);
}

impl<F> MetricsSubscriber for F
where
    F: Fn(&ServiceMetrics),
{
    fn on_metrics_updated(&self, metrics: &ServiceMetrics) {
        self(metrics)
    }
}
