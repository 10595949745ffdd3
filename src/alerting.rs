//! Threshold Alerting
//!
//! Reacts to "metrics updated" notifications and keeps an append-only log of
//! alerts raised for error-rate and health-tier breaches.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::MetricsSubscriber;
use crate::error::{Error, Result};
use crate::monitoring::{HealthEvaluator, HealthStatus, ServiceMetrics};

// =============================================================================
// Configuration
// =============================================================================

/// Alerting configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Error rate above which a high-error-rate alert is raised
    pub error_threshold: f64,
    /// Minimum sample size before any check runs
    pub min_requests: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            error_threshold: 0.1,
            min_requests: 5,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<()> {
        if self.error_threshold.is_nan() || self.error_threshold < 0.0 {
            return Err(Error::Config(format!(
                "alert error threshold must be a non-negative number, got {}",
                self.error_threshold
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Alert
// =============================================================================

/// What an alert was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Error rate crossed the configured threshold
    HighErrorRate,
    /// Health evaluation returned Unhealthy
    Unhealthy,
}

/// A single alert. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub service_name: String,
    pub timestamp: DateTime<Local>,
}

impl Alert {
    /// Create an alert stamped with the current local time.
    pub fn new(kind: AlertKind, message: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            service_name: service_name.into(),
            timestamp: Local::now(),
        }
    }

    /// High-error-rate alert for `metrics`, reporting observed vs threshold.
    pub fn high_error_rate(metrics: &ServiceMetrics, threshold: f64) -> Self {
        let message = format!(
            "High error rate: {:.1}% (> {:.1}%)",
            metrics.error_rate() * 100.0,
            threshold * 100.0
        );
        Self::new(AlertKind::HighErrorRate, message, metrics.service_name())
    }

    /// Unhealthy-tier alert for `metrics`.
    pub fn unhealthy(metrics: &ServiceMetrics) -> Self {
        let message = format!("Service status: {}", HealthStatus::Unhealthy.as_upper());
        Self::new(AlertKind::Unhealthy, message, metrics.service_name())
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] ALERT [{}]: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.service_name,
            self.message
        )
    }
}

// =============================================================================
// Alert Manager
// =============================================================================

/// Alerting subscriber.
///
/// Attach to a [`MetricsCollector`](crate::monitoring::MetricsCollector) via
/// `Arc`; the alert log is append-only.
#[derive(Debug, Default)]
pub struct AlertManager {
    config: AlertConfig,
    alerts: RwLock<Vec<Alert>>,
}

impl AlertManager {
    /// Create a manager with the given configuration.
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Run both checks against `metrics` and append whatever fires.
    ///
    /// Returns the alerts raised by this call (zero, one or two).
    pub fn evaluate(&self, metrics: &ServiceMetrics) -> Vec<Alert> {
        if metrics.total_requests() < self.config.min_requests {
            return Vec::new();
        }

        let mut raised = Vec::new();

        if metrics.error_rate() > self.config.error_threshold {
            raised.push(Alert::high_error_rate(metrics, self.config.error_threshold));
        }

        // Health is always judged with the default thresholds.
        if HealthEvaluator::new().evaluate(metrics) == HealthStatus::Unhealthy {
            raised.push(Alert::unhealthy(metrics));
        }

        for alert in &raised {
            warn!(
                service = %alert.service_name,
                kind = ?alert.kind,
                "{} for {}",
                alert.message,
                alert.service_name
            );
        }

        if !raised.is_empty() {
            self.alerts.write().extend(raised.iter().cloned());
        }

        raised
    }

    /// All alerts raised so far, oldest first
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }

    /// Alerts raised for one service
    pub fn alerts_for(&self, service_name: &str) -> Vec<Alert> {
        self.alerts
            .read()
            .iter()
            .filter(|a| a.service_name == service_name)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }
}

impl MetricsSubscriber for AlertManager {
    fn on_metrics_updated(&self, metrics: &ServiceMetrics) {
        self.evaluate(metrics);
    }
}
