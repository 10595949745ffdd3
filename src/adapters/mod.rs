//! Subscriber Adapters
//!
//! Adapter implementations of the `MetricsSubscriber` port, following the
//! Port/Adapter (Hexagonal) architecture pattern.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            Port: MetricsSubscriber (domain)               │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  LoggingSubscriber │ PrometheusExporter │ AlertManager    │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod logging;
mod prometheus;

pub use self::logging::LoggingSubscriber;
pub use self::prometheus::PrometheusExporter;
