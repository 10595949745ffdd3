//! Simulation Driver
//!
//! Generates a batch of synthetic requests, routes each to its service,
//! feeds the responses to the metrics collector (which notifies alerting
//! synchronously) and snapshots per-service summaries along the way.
//!
//! ```text
//! generate ──▶ SimulatedService::process ──▶ MetricsCollector::record
//!                                                   │
//!                                                   ▼
//!                                   AlertManager (+ other subscribers)
//! ```

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alerting::{Alert, AlertConfig, AlertManager};
use crate::domain::{MetricsSubscriber, Request, Response};
use crate::error::{Error, Result};
use crate::monitoring::{HealthEvaluator, HealthStatus, MetricsCollector, ServiceMetrics};
use crate::service::SimulatedService;

// =============================================================================
// Configuration
// =============================================================================

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of requests to generate
    pub request_count: usize,
    /// Emit a summary after every N processed requests
    pub summary_interval: usize,
    /// Smallest payload size (inclusive)
    pub payload_min: u32,
    /// Largest payload size (exclusive)
    pub payload_max: u32,
    /// Probability that a request carries a deadline
    pub deadline_probability: f64,
    /// Smallest deadline (inclusive)
    pub deadline_min_ms: u32,
    /// Largest deadline (exclusive)
    pub deadline_max_ms: u32,
    /// Alerting thresholds
    pub alert: AlertConfig,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            request_count: 80,
            summary_interval: 20,
            payload_min: 50,
            payload_max: 500,
            deadline_probability: 1.0 / 9.0,
            deadline_min_ms: 100,
            deadline_max_ms: 500,
            alert: AlertConfig {
                error_threshold: 0.1,
                min_requests: 3,
            },
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter can be sampled.
    pub fn validate(&self) -> Result<()> {
        if self.request_count == 0 {
            return Err(Error::Config("request_count must be positive".to_string()));
        }
        if self.summary_interval == 0 {
            return Err(Error::Config(
                "summary_interval must be positive".to_string(),
            ));
        }
        if self.payload_min >= self.payload_max {
            return Err(Error::Config(format!(
                "payload range [{}, {}) is empty",
                self.payload_min, self.payload_max
            )));
        }
        if !(0.0..=1.0).contains(&self.deadline_probability) {
            return Err(Error::Config(format!(
                "deadline_probability {} outside [0, 1]",
                self.deadline_probability
            )));
        }
        if self.deadline_min_ms >= self.deadline_max_ms {
            return Err(Error::Config(format!(
                "deadline range [{}, {}) is empty",
                self.deadline_min_ms, self.deadline_max_ms
            )));
        }
        self.alert.validate()
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Point-in-time view of one service with its health tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub service_name: String,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub error_rate: f64,
    pub average_latency_ms: f64,
    pub max_latency_ms: u32,
    pub health: HealthStatus,
}

impl ServiceSummary {
    pub fn from_metrics(metrics: &ServiceMetrics, evaluator: &HealthEvaluator) -> Self {
        Self {
            service_name: metrics.service_name().to_string(),
            total_requests: metrics.total_requests(),
            successful_requests: metrics.successful_requests(),
            failed_requests: metrics.failed_requests(),
            error_rate: metrics.error_rate(),
            average_latency_ms: metrics.average_latency_ms(),
            max_latency_ms: metrics.max_latency_ms(),
            health: evaluator.evaluate(metrics),
        }
    }
}

impl std::fmt::Display for ServiceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} req, err={:.1}%, avgLat={:.1}ms, maxLat={}ms, status={}",
            self.service_name,
            self.total_requests,
            self.error_rate * 100.0,
            self.average_latency_ms,
            self.max_latency_ms,
            self.health
        )
    }
}

/// Summaries taken after `processed` requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub processed: usize,
    pub services: Vec<ServiceSummary>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Requests generated and routed
    pub requests_processed: usize,
    /// Requests addressed to a service nobody registered
    pub unknown_service_records: usize,
    /// Periodic summaries, one per `summary_interval`
    pub checkpoints: Vec<Checkpoint>,
    /// Final per-service summaries
    pub services: Vec<ServiceSummary>,
    /// Every alert raised, oldest first
    pub alerts: Vec<Alert>,
}

impl SimulationReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One summary line per service.
pub fn render_summaries(services: &[ServiceSummary]) -> String {
    services
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per alert, or `No alerts.` when the log is empty.
pub fn render_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts.".to_string();
    }
    alerts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Simulation
// =============================================================================

/// Single-threaded driver wiring services, metrics and alerting together.
pub struct Simulation {
    config: SimulationConfig,
    services: Vec<SimulatedService>,
    collector: MetricsCollector,
    alerts: Arc<AlertManager>,
    evaluator: HealthEvaluator,
    rng: StdRng,
}

impl Simulation {
    /// Driver with the fast and slow services.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_services(
            config,
            vec![SimulatedService::fast(), SimulatedService::slow()],
        )
    }

    /// Driver with a custom service set.
    ///
    /// Every service is registered with the collector and the alert manager
    /// is attached as the first subscriber.
    pub fn with_services(config: SimulationConfig, services: Vec<SimulatedService>) -> Result<Self> {
        config.validate()?;
        if services.is_empty() {
            return Err(Error::Config("at least one service is required".to_string()));
        }

        let mut collector = MetricsCollector::new();
        for service in &services {
            collector.register_service(service);
        }

        let alerts = Arc::new(AlertManager::new(config.alert));
        collector.subscribe(alerts.clone());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            services,
            collector,
            alerts,
            evaluator: HealthEvaluator::new(),
            rng,
        })
    }

    /// Attach an extra subscriber after the alert manager.
    pub fn subscribe(&mut self, subscriber: Arc<dyn MetricsSubscriber>) {
        self.collector.subscribe(subscriber);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    pub fn alert_manager(&self) -> &AlertManager {
        &self.alerts
    }

    /// Generate the request batch.
    ///
    /// Each request picks a service uniformly, a payload in the configured
    /// range and, with `deadline_probability`, a deadline.
    pub fn generate_requests(&mut self) -> Vec<Request> {
        let cfg = &self.config;
        let mut requests = Vec::with_capacity(cfg.request_count);

        for _ in 0..cfg.request_count {
            let service = &self.services[self.rng.gen_range(0..self.services.len())];
            let payload = self.rng.gen_range(cfg.payload_min..cfg.payload_max);

            let mut request = Request::new(service.name(), payload);
            if self.rng.gen_bool(cfg.deadline_probability) {
                request = request.with_deadline(
                    self.rng.gen_range(cfg.deadline_min_ms..cfg.deadline_max_ms),
                );
            }
            requests.push(request);
        }

        debug!(count = requests.len(), "Generated requests");
        requests
    }

    /// Route a request to its service and process it.
    pub fn process(&mut self, request: &Request) -> Result<Response> {
        let service = self
            .services
            .iter()
            .find(|s| s.name() == request.service_name)
            .ok_or_else(|| Error::unknown_service(&request.service_name))?;

        Ok(service.process(request, &mut self.rng))
    }

    /// Process a request and record its response.
    pub fn handle(&mut self, request: &Request) -> Result<()> {
        let response = self.process(request)?;
        self.collector.record(request, &response)?;
        Ok(())
    }

    /// Current summaries for every registered service.
    pub fn summaries(&self) -> Vec<ServiceSummary> {
        self.collector
            .iter()
            .map(|m| ServiceSummary::from_metrics(m, &self.evaluator))
            .collect()
    }

    /// Run a generated batch. See [`Simulation::run_with`].
    pub fn run(&mut self) -> SimulationReport {
        self.run_with(|_| {})
    }

    /// Run a generated batch, calling `on_checkpoint` after every
    /// `summary_interval` requests.
    pub fn run_with<F>(&mut self, on_checkpoint: F) -> SimulationReport
    where
        F: FnMut(&Checkpoint),
    {
        let requests = self.generate_requests();
        self.run_requests(&requests, on_checkpoint)
    }

    /// Run a caller-supplied batch in order.
    ///
    /// Requests for unknown services are logged, counted and skipped.
    pub fn run_requests<F>(&mut self, requests: &[Request], mut on_checkpoint: F) -> SimulationReport
    where
        F: FnMut(&Checkpoint),
    {
        info!(
            requests = requests.len(),
            services = self.services.len(),
            "Starting simulation"
        );

        let mut unknown = 0;
        let mut checkpoints = Vec::new();

        for (i, request) in requests.iter().enumerate() {
            if let Err(e) = self.handle(request) {
                warn!(service = %request.service_name, error = %e, "Request not recorded");
                unknown += 1;
            }

            let processed = i + 1;
            if processed % self.config.summary_interval == 0 {
                let checkpoint = Checkpoint {
                    processed,
                    services: self.summaries(),
                };
                on_checkpoint(&checkpoint);
                checkpoints.push(checkpoint);
            }
        }

        let report = SimulationReport {
            requests_processed: requests.len(),
            unknown_service_records: unknown,
            checkpoints,
            services: self.summaries(),
            alerts: self.alerts.alerts(),
        };

        info!(
            processed = report.requests_processed,
            alerts = report.alerts.len(),
            "Simulation complete"
        );

        report
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("services", &self.services)
            .field("collector", &self.collector)
            .finish()
    }
}
