//! Request / Response Value Types
//!
//! Immutable descriptions of a unit of simulated work and its outcome.

use serde::{Deserialize, Serialize};

/// A unit of work addressed to a named service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the service that should process this request
    pub service_name: String,
    /// Payload size in bytes
    pub payload_size: u32,
    /// Optional deadline in milliseconds.
    ///
    /// Carried as data only; nothing in the pipeline enforces it.
    pub deadline_ms: Option<u32>,
}

impl Request {
    /// Create a request without a deadline.
    pub fn new(service_name: impl Into<String>, payload_size: u32) -> Self {
        Self {
            service_name: service_name.into(),
            payload_size,
            deadline_ms: None,
        }
    }

    /// Attach a deadline.
    pub fn with_deadline(mut self, deadline_ms: u32) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }
}

/// Outcome of processing a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the simulated call succeeded
    pub is_success: bool,
    /// Observed latency in milliseconds
    pub latency_ms: u32,
    /// Error code, present only on failure
    pub error_code: Option<String>,
    /// Error message, present only on failure
    pub error_message: Option<String>,
}

impl Response {
    /// Create a successful response.
    pub fn success(latency_ms: u32) -> Self {
        Self {
            is_success: true,
            latency_ms,
            error_code: None,
            error_message: None,
        }
    }

    /// Create a failed response.
    pub fn failure(
        latency_ms: u32,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            is_success: false,
            latency_ms,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
        }
    }

    /// Short outcome label used in logs.
    pub fn outcome(&self) -> &'static str {
        if self.is_success {
            "OK"
        } else {
            "FAIL"
        }
    }
}
