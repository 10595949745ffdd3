//! Health Evaluation
//!
//! Classifies a service into Healthy / Degraded / Unhealthy from its
//! aggregated error rate and average latency.

use serde::{Deserialize, Serialize};

use super::collector::ServiceMetrics;

/// Health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Service is healthy
    Healthy,
    /// Service is degraded but operational
    Degraded,
    /// Service is unhealthy
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is healthy or degraded (operational)
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }

    /// Check if status is healthy
    pub fn is_healthy(&self) -> bool {
        *self == HealthStatus::Healthy
    }

    /// Upper-case label used in alert messages
    pub fn as_upper(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Degraded => "DEGRADED",
            HealthStatus::Unhealthy => "UNHEALTHY",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Degraded => write!(f, "Degraded"),
            HealthStatus::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}

/// Thresholds separating the three health tiers.
///
/// A value strictly above a `max_healthy_*` bound leaves the Healthy tier;
/// strictly above a `max_degraded_*` bound lands in Unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Highest error rate still considered healthy
    pub max_healthy_error_rate: f64,
    /// Highest error rate still considered degraded
    pub max_degraded_error_rate: f64,
    /// Highest average latency (ms) still considered healthy
    pub max_healthy_latency_ms: u32,
    /// Highest average latency (ms) still considered degraded
    pub max_degraded_latency_ms: u32,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            max_healthy_error_rate: 0.05,
            max_degraded_error_rate: 0.20,
            max_healthy_latency_ms: 150,
            max_degraded_latency_ms: 400,
        }
    }
}

/// Stateless health evaluator.
#[derive(Debug, Clone, Default)]
pub struct HealthEvaluator {
    thresholds: HealthThresholds,
}

impl HealthEvaluator {
    /// Create an evaluator with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom thresholds.
    pub fn with_thresholds(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    /// Get the thresholds in use.
    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Classify a metrics snapshot.
    pub fn evaluate(&self, metrics: &ServiceMetrics) -> HealthStatus {
        self.classify(metrics.error_rate(), metrics.average_latency_ms())
    }

    /// Classify a raw (error rate, average latency) pair.
    ///
    /// Unhealthy bounds are checked first, so a service breaching either
    /// degraded bound is Unhealthy regardless of the other input.
    pub fn classify(&self, error_rate: f64, average_latency_ms: f64) -> HealthStatus {
        let t = &self.thresholds;

        if error_rate > t.max_degraded_error_rate
            || average_latency_ms > f64::from(t.max_degraded_latency_ms)
        {
            return HealthStatus::Unhealthy;
        }

        if error_rate > t.max_healthy_error_rate
            || average_latency_ms > f64::from(t.max_healthy_latency_ms)
        {
            return HealthStatus::Degraded;
        }

        HealthStatus::Healthy
    }
}

// =============================================================================
// Tests
// =============================================================================
