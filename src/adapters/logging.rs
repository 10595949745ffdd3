//! Logging Subscriber Adapter
//!
//! Implements the `MetricsSubscriber` port by writing every metrics update
//! to the tracing/logging system.

use tracing::{debug, info};

use crate::domain::MetricsSubscriber;
use crate::monitoring::ServiceMetrics;

/// Logging-based metrics subscriber.
///
/// Useful for development, debugging, and audit trails.
#[derive(Debug, Clone, Default)]
pub struct LoggingSubscriber {
    /// Whether to log updates at info level (true) or debug level (false)
    info_level: bool,
}

impl LoggingSubscriber {
    /// Create a new logging subscriber (debug level).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a subscriber that logs at info level.
    pub fn info_level() -> Self {
        Self { info_level: true }
    }

    /// Create a subscriber that logs at debug level.
    pub fn debug_level() -> Self {
        Self { info_level: false }
    }

    pub fn is_info_level(&self) -> bool {
        self.info_level
    }
}

impl MetricsSubscriber for LoggingSubscriber {
    fn on_metrics_updated(&self, metrics: &ServiceMetrics) {
        let json = serde_json::to_string(metrics).unwrap_or_else(|_| format!("{:?}", metrics));

        if self.info_level {
            info!(service = %metrics.service_name(), metrics = %json, "Metrics updated");
        } else {
            debug!(service = %metrics.service_name(), metrics = %json, "Metrics updated");
        }
    }
}
