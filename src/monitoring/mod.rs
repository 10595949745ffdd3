//! Service Monitoring
//!
//! Metrics aggregation and health classification.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Monitoring                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Response ──▶ MetricsCollector ──▶ ServiceMetrics (per name)  │
//! │                      │                       │               │
//! │                      ▼                       ▼               │
//! │            MetricsSubscriber(s)       HealthEvaluator        │
//! │          (alerting, logging, ...)   Healthy/Degraded/Unhealthy│
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod collector;
mod health;
mod proptest;

pub use collector::{MetricsCollector, ServiceMetrics};
pub use health::{HealthEvaluator, HealthStatus, HealthThresholds};
