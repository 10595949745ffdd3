//! Prometheus Exposition Adapter
//!
//! Implements the `MetricsSubscriber` port by mirroring every service's
//! metrics into a private `prometheus::Registry`, which can be rendered in
//! the Prometheus text format.

use prometheus::{Encoder, GaugeVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::domain::MetricsSubscriber;
use crate::error::Result;
use crate::monitoring::{HealthEvaluator, HealthStatus, ServiceMetrics};

/// Metric name prefix
const NAMESPACE: &str = "svcpulse";

/// Label carrying the service name
const SERVICE_LABEL: &str = "service";

/// Prometheus-backed metrics subscriber.
pub struct PrometheusExporter {
    registry: Registry,
    requests: IntGaugeVec,
    successful: IntGaugeVec,
    failed: IntGaugeVec,
    latency_avg: GaugeVec,
    latency_max: IntGaugeVec,
    error_rate: GaugeVec,
    health: IntGaugeVec,
}

impl PrometheusExporter {
    /// Create an exporter with its own registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests = int_gauge_vec(&registry, "requests", "Requests recorded per service")?;
        let successful = int_gauge_vec(
            &registry,
            "successful_requests",
            "Successful requests recorded per service",
        )?;
        let failed = int_gauge_vec(
            &registry,
            "failed_requests",
            "Failed requests recorded per service",
        )?;
        let latency_avg = gauge_vec(
            &registry,
            "latency_avg_ms",
            "Mean observed latency in milliseconds",
        )?;
        let latency_max = int_gauge_vec(
            &registry,
            "latency_max_ms",
            "Maximum observed latency in milliseconds",
        )?;
        let error_rate = gauge_vec(&registry, "error_rate", "Failed / total requests")?;
        let health = int_gauge_vec(
            &registry,
            "health",
            "Health tier: 0 = healthy, 1 = degraded, 2 = unhealthy",
        )?;

        Ok(Self {
            registry,
            requests,
            successful,
            failed,
            latency_avg,
            latency_max,
            error_rate,
            health,
        })
    }

    /// Get the underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mirror one service's metrics into the registry.
    pub fn observe(&self, metrics: &ServiceMetrics) {
        let labels = [metrics.service_name()];

        self.requests
            .with_label_values(&labels)
            .set(clamp_i64(metrics.total_requests()));
        self.successful
            .with_label_values(&labels)
            .set(clamp_i64(metrics.successful_requests()));
        self.failed
            .with_label_values(&labels)
            .set(clamp_i64(metrics.failed_requests()));
        self.latency_avg
            .with_label_values(&labels)
            .set(metrics.average_latency_ms());
        self.latency_max
            .with_label_values(&labels)
            .set(i64::from(metrics.max_latency_ms()));
        self.error_rate
            .with_label_values(&labels)
            .set(metrics.error_rate());
        self.health
            .with_label_values(&labels)
            .set(health_code(HealthEvaluator::new().evaluate(metrics)));
    }

    /// Render the registry in the Prometheus text format.
    pub fn export_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSubscriber for PrometheusExporter {
    fn on_metrics_updated(&self, metrics: &ServiceMetrics) {
        self.observe(metrics);
    }
}

impl std::fmt::Debug for PrometheusExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusExporter")
            .field("families", &self.registry.gather().len())
            .finish()
    }
}

fn int_gauge_vec(registry: &Registry, name: &str, help: &str) -> Result<IntGaugeVec> {
    let gauge = IntGaugeVec::new(
        Opts::new(name, help).namespace(NAMESPACE).subsystem("service"),
        &[SERVICE_LABEL],
    )?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn gauge_vec(registry: &Registry, name: &str, help: &str) -> Result<GaugeVec> {
    let gauge = GaugeVec::new(
        Opts::new(name, help).namespace(NAMESPACE).subsystem("service"),
        &[SERVICE_LABEL],
    )?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn health_code(status: HealthStatus) -> i64 {
    match status {
        HealthStatus::Healthy => 0,
        HealthStatus::Degraded => 1,
        HealthStatus::Unhealthy => 2,
    }
}
