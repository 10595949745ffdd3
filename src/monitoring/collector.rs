//! Metrics Collector
//!
//! Per-service running counters updated from observed responses, with
//! synchronous "metrics updated" notifications to attached subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{MetricsSubscriber, Request, Response};
use crate::error::{Error, Result};
use crate::service::SimulatedService;

/// Aggregated metrics for one service.
///
/// Invariants maintained by [`ServiceMetrics::update`]:
/// - `total_requests == successful_requests + failed_requests`
/// - `average_latency_ms()` is the exact mean of all recorded latencies
/// - `max_latency_ms` is the largest recorded latency, 0 if none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetrics {
    service_name: String,
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    total_latency_ms: u64,
    max_latency_ms: u32,
}

impl ServiceMetrics {
    /// Create zeroed metrics for a service.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            total_latency_ms: 0,
            max_latency_ms: 0,
        }
    }

    /// Fold one response into the counters.
    pub fn update(&mut self, response: &Response) {
        self.total_requests += 1;
        if response.is_success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }

        self.total_latency_ms += u64::from(response.latency_ms);
        self.max_latency_ms = self.max_latency_ms.max(response.latency_ms);
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn successful_requests(&self) -> u64 {
        self.successful_requests
    }

    pub fn failed_requests(&self) -> u64 {
        self.failed_requests
    }

    /// Sum of all recorded latencies
    pub fn total_latency_ms(&self) -> u64 {
        self.total_latency_ms
    }

    pub fn max_latency_ms(&self) -> u32 {
        self.max_latency_ms
    }

    /// Mean latency, 0.0 when nothing has been recorded
    pub fn average_latency_ms(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.total_latency_ms as f64 / self.total_requests as f64
    }

    /// Failed / total, 0.0 when nothing has been recorded
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.failed_requests as f64 / self.total_requests as f64
    }

    /// Successful / total, 0.0 when nothing has been recorded
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful_requests as f64 / self.total_requests as f64
    }
}

/// Metrics collector
///
/// Owns the service name → [`ServiceMetrics`] mapping. Services keep the
/// order in which they were registered.
#[derive(Default)]
pub struct MetricsCollector {
    /// Metrics in registration order
    metrics: Vec<ServiceMetrics>,
    /// Service name → position in `metrics`
    index: HashMap<String, usize>,
    /// Notified after every successful record, in attachment order
    subscribers: Vec<Arc<dyn MetricsSubscriber>>,
}

impl MetricsCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service by its name.
    ///
    /// See [`MetricsCollector::register`].
    pub fn register_service(&mut self, service: &SimulatedService) -> bool {
        self.register(service.name())
    }

    /// Register a service name, creating zeroed metrics.
    ///
    /// Idempotent: returns `false` and leaves the existing metrics untouched
    /// when the name is already registered.
    pub fn register(&mut self, service_name: impl Into<String>) -> bool {
        let service_name = service_name.into();
        if self.index.contains_key(&service_name) {
            return false;
        }

        debug!(service = %service_name, "Registered service");
        self.index.insert(service_name.clone(), self.metrics.len());
        self.metrics.push(ServiceMetrics::new(service_name));
        true
    }

    /// Attach a subscriber. Subscribers cannot be detached.
    pub fn subscribe(&mut self, subscriber: Arc<dyn MetricsSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Record a response for `request.service_name`, then notify subscribers.
    ///
    /// Returns [`Error::UnknownService`] without touching any state or
    /// notifying anyone when the service was never registered.
    pub fn record(&mut self, request: &Request, response: &Response) -> Result<&ServiceMetrics> {
        let idx = *self
            .index
            .get(&request.service_name)
            .ok_or_else(|| Error::unknown_service(&request.service_name))?;

        self.metrics[idx].update(response);

        let metrics = &self.metrics[idx];
        for subscriber in &self.subscribers {
            subscriber.on_metrics_updated(metrics);
        }

        Ok(metrics)
    }

    /// Snapshot of every registered service's metrics
    pub fn current_metrics(&self) -> Vec<ServiceMetrics> {
        self.metrics.clone()
    }

    /// Metrics for one service
    pub fn metrics(&self, service_name: &str) -> Option<&ServiceMetrics> {
        self.index.get(service_name).map(|&idx| &self.metrics[idx])
    }

    /// Iterate live metrics without cloning
    pub fn iter(&self) -> impl Iterator<Item = &ServiceMetrics> {
        self.metrics.iter()
    }

    /// Number of registered services
    pub fn service_count(&self) -> usize {
        self.metrics.len()
    }

    /// Number of attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("metrics", &self.metrics)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
