//! Simulated Services
//!
//! A service turns a [`Request`] into a [`Response`] by drawing a latency and
//! a success flag from its [`ServiceProfile`]. Failure is a value on the
//! response, never an error.
//!
//! ```text
//! latency = max(floor, base + uniform[jitter_min, jitter_max))
//! success = uniform[0, 1) > failure_probability
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Request, Response};
use crate::error::{Error, Result};

/// Built-in service variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Low latency, rare failures
    Fast,
    /// High latency, frequent failures
    Slow,
}

impl ServiceKind {
    /// Constants for this variant.
    pub fn profile(&self) -> ServiceProfile {
        match self {
            ServiceKind::Fast => ServiceProfile {
                name: "FastService".to_string(),
                base_latency_ms: 50,
                jitter_min_ms: -10,
                jitter_max_ms: 20,
                min_latency_ms: 1,
                failure_probability: 0.05,
                error_code: "ERR_FAST".to_string(),
                error_message: "FastService failed".to_string(),
            },
            ServiceKind::Slow => ServiceProfile {
                name: "SlowService".to_string(),
                base_latency_ms: 200,
                jitter_min_ms: -30,
                jitter_max_ms: 60,
                min_latency_ms: 10,
                failure_probability: 0.15,
                error_code: "ERR_SLOW".to_string(),
                error_message: "SlowService failed".to_string(),
            },
        }
    }
}

/// Latency / failure profile of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProfile {
    /// Service name, used to route requests and key metrics
    pub name: String,
    /// Latency before jitter
    pub base_latency_ms: u32,
    /// Lower jitter bound (inclusive)
    pub jitter_min_ms: i32,
    /// Upper jitter bound (exclusive)
    pub jitter_max_ms: i32,
    /// Latency floor applied after jitter
    pub min_latency_ms: u32,
    /// Probability in [0, 1] that a request fails
    pub failure_probability: f64,
    /// Error code reported on failure
    pub error_code: String,
    /// Error message reported on failure
    pub error_message: String,
}

impl ServiceProfile {
    /// Reject profiles that cannot be sampled.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("service name must not be empty".to_string()));
        }
        if self.jitter_min_ms >= self.jitter_max_ms {
            return Err(Error::Config(format!(
                "{}: jitter range [{}, {}) is empty",
                self.name, self.jitter_min_ms, self.jitter_max_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.failure_probability) {
            return Err(Error::Config(format!(
                "{}: failure probability {} outside [0, 1]",
                self.name, self.failure_probability
            )));
        }
        Ok(())
    }
}

/// A service with a fixed profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedService {
    profile: ServiceProfile,
}

impl SimulatedService {
    /// Create one of the built-in variants.
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            profile: kind.profile(),
        }
    }

    /// The fast variant
    pub fn fast() -> Self {
        Self::new(ServiceKind::Fast)
    }

    /// The slow variant
    pub fn slow() -> Self {
        Self::new(ServiceKind::Slow)
    }

    /// Create a service from a custom profile.
    pub fn from_profile(profile: ServiceProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self { profile })
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn base_latency_ms(&self) -> u32 {
        self.profile.base_latency_ms
    }

    pub fn failure_probability(&self) -> f64 {
        self.profile.failure_probability
    }

    pub fn profile(&self) -> &ServiceProfile {
        &self.profile
    }

    /// Process a request, drawing latency and outcome from `rng`.
    ///
    /// `request.deadline_ms` is not consulted.
    pub fn process<R: Rng + ?Sized>(&self, request: &Request, rng: &mut R) -> Response {
        let p = &self.profile;

        let jitter = rng.gen_range(p.jitter_min_ms..p.jitter_max_ms);
        let latency = (i64::from(p.base_latency_ms) + i64::from(jitter))
            .max(i64::from(p.min_latency_ms))
            .min(i64::from(u32::MAX)) as u32;

        let is_success = rng.gen::<f64>() > p.failure_probability;
        let response = if is_success {
            Response::success(latency)
        } else {
            Response::failure(latency, p.error_code.as_str(), p.error_message.as_str())
        };

        info!(
            service = %p.name,
            payload_size = request.payload_size,
            outcome = response.outcome(),
            latency_ms = latency,
            "{}: {}B -> {} ({}ms)",
            p.name,
            request.payload_size,
            response.outcome(),
            latency
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_profiles() {
        let fast = SimulatedService::fast();
        assert_eq!(fast.name(), "FastService");
        assert_eq!(fast.base_latency_ms(), 50);
        assert_eq!(fast.failure_probability(), 0.05);

        let slow = SimulatedService::slow();
        assert_eq!(slow.name(), "SlowService");
        assert_eq!(slow.base_latency_ms(), 200);
        assert_eq!(slow.failure_probability(), 0.15);
        assert_eq!(slow.profile().min_latency_ms, 10);
    }

    #[test]
    fn test_fast_latency_range() {
        let service = SimulatedService::fast();
        let mut rng = StdRng::seed_from_u64(7);
        let request = Request::new("FastService", 100);

        for _ in 0..500 {
            let response = service.process(&request, &mut rng);
            assert!((40..70).contains(&response.latency_ms));
        }
    }

    #[test]
    fn test_slow_latency_range() {
        let service = SimulatedService::slow();
        let mut rng = StdRng::seed_from_u64(7);
        let request = Request::new("SlowService", 100);

        for _ in 0..500 {
            let response = service.process(&request, &mut rng);
            assert!((170..260).contains(&response.latency_ms));
        }
    }

    #[test]
    fn test_latency_floor() {
        let service = SimulatedService::from_profile(ServiceProfile {
            name: "Floored".to_string(),
            base_latency_ms: 0,
            jitter_min_ms: -50,
            jitter_max_ms: -40,
            min_latency_ms: 10,
            failure_probability: 0.0,
            error_code: "ERR".to_string(),
            error_message: "failed".to_string(),
        })
        .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let response = service.process(&Request::new("Floored", 1), &mut rng);
        assert_eq!(response.latency_ms, 10);
    }

    #[test]
    fn test_always_failing_profile() {
        let mut profile = ServiceKind::Slow.profile();
        profile.failure_probability = 1.0;
        let service = SimulatedService::from_profile(profile).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let response = service.process(&Request::new("SlowService", 10), &mut rng);
            assert!(!response.is_success);
            assert_eq!(response.error_code.as_deref(), Some("ERR_SLOW"));
            assert_eq!(response.error_message.as_deref(), Some("SlowService failed"));
        }
    }

    #[test]
    fn test_success_has_no_error_fields() {
        let service = SimulatedService::fast();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let response = service.process(&Request::new("FastService", 10), &mut rng);
            if response.is_success {
                assert!(response.error_code.is_none());
                assert!(response.error_message.is_none());
            } else {
                assert_eq!(response.error_code.as_deref(), Some("ERR_FAST"));
            }
        }
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let service = SimulatedService::slow();
        let request = Request::new("SlowService", 300).with_deadline(150);

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(service.process(&request, &mut a), service.process(&request, &mut b));
        }
    }

    #[test]
    fn test_invalid_profiles_rejected() {
        let mut profile = ServiceKind::Fast.profile();
        profile.jitter_min_ms = 5;
        profile.jitter_max_ms = 5;
        assert_matches!(SimulatedService::from_profile(profile), Err(Error::Config(_)));

        let mut profile = ServiceKind::Fast.profile();
        profile.failure_probability = 1.5;
        assert_matches!(SimulatedService::from_profile(profile), Err(Error::Config(_)));

        let mut profile = ServiceKind::Fast.profile();
        profile.name.clear();
        assert_matches!(SimulatedService::from_profile(profile), Err(Error::Config(_)));
    }
}
