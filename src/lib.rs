//! svcpulse - Service Health Simulation
//!
//! Simulated services produce randomized latency/failure outcomes; a metrics
//! collector aggregates per-service counters; a health evaluator classifies
//! services into three tiers; an alerting subscriber reacts to every metrics
//! update and records threshold breaches.
//!
//! # Architecture
//!
//! ```text
//! Driver → Service (process) → MetricsCollector (record) → Subscribers (alerting, ...)
//! ```
//!
//! Everything runs synchronously on the calling thread.
//!
//! # Modules
//!
//! - [`adapters`] - Logging and Prometheus subscribers
//! - [`alerting`] - Threshold alerting and the alert log
//! - [`domain`] - Request/Response value types and the subscriber port
//! - [`error`] - Error types
//! - [`monitoring`] - Metrics aggregation and health evaluation
//! - [`service`] - Simulated service variants
//! - [`simulation`] - Request generation and the driver loop

pub mod adapters;
pub mod alerting;
pub mod domain;
pub mod error;
pub mod monitoring;
pub mod service;
pub mod simulation;

// Re-export commonly used types
pub use alerting::{Alert, AlertConfig, AlertKind, AlertManager};
pub use domain::{MetricsSubscriber, Request, Response};
pub use error::{Error, Result};
pub use monitoring::{
    HealthEvaluator, HealthStatus, HealthThresholds, MetricsCollector, ServiceMetrics,
};
pub use service::{ServiceKind, ServiceProfile, SimulatedService};
pub use simulation::{Simulation, SimulationConfig, SimulationReport};
