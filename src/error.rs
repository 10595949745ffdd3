//! Error types for the service health simulation

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while aggregating metrics or running the simulation.
///
/// A simulated request failure is not an error: it travels as a
/// [`Response`](crate::domain::Response) with `is_success == false`.
#[derive(Error, Debug)]
pub enum Error {
    /// Metrics were recorded for a service that was never registered
    #[error("Unknown service: {service_name}")]
    UnknownService { service_name: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prometheus registry or encoding error
    #[error("Metrics exposition error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an [`Error::UnknownService`] for the given name.
    pub fn unknown_service(service_name: impl Into<String>) -> Self {
        Error::UnknownService {
            service_name: service_name.into(),
        }
    }
}
