//! Property-Based Tests for Metrics Aggregation and Health Evaluation
//!
//! # Test Properties
//!
//! 1. **Counter Consistency**: total = successful + failed after every record
//! 2. **Exact Mean**: average latency equals the arithmetic mean per service
//! 3. **Monotonic Max**: max latency never decreases
//! 4. **Pure Classification**: health depends only on (error rate, latency)

#![cfg(test)]

use proptest::prelude::*;

use super::collector::{MetricsCollector, ServiceMetrics};
use super::health::{HealthEvaluator, HealthStatus};
use crate::domain::{Request, Response};

// =============================================================================
// Property Strategies
// =============================================================================

/// Strategy for a single observed outcome: (success, latency)
fn outcome_strategy() -> impl Strategy<Value = (bool, u32)> {
    (any::<bool>(), 1u32..1_000)
}

/// Strategy for a stream of (service index, success, latency) observations
fn interleaved_strategy() -> impl Strategy<Value = Vec<(usize, bool, u32)>> {
    prop::collection::vec((0usize..3, any::<bool>(), 1u32..1_000), 0..200)
}

fn response(success: bool, latency_ms: u32) -> Response {
    if success {
        Response::success(latency_ms)
    } else {
        Response::failure(latency_ms, "ERR_TEST", "test failure")
    }
}

const SERVICES: [&str; 3] = ["alpha", "beta", "gamma"];

// =============================================================================
// Aggregation Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_counters_consistent(outcomes in prop::collection::vec(outcome_strategy(), 0..200)) {
        let mut metrics = ServiceMetrics::new("alpha");

        for (success, latency) in outcomes {
            metrics.update(&response(success, latency));
            prop_assert_eq!(
                metrics.total_requests(),
                metrics.successful_requests() + metrics.failed_requests()
            );
        }
    }

    #[test]
    fn prop_max_latency_monotonic(outcomes in prop::collection::vec(outcome_strategy(), 1..200)) {
        let mut metrics = ServiceMetrics::new("alpha");
        let mut previous = 0;

        for (success, latency) in outcomes {
            metrics.update(&response(success, latency));
            prop_assert!(metrics.max_latency_ms() >= previous);
            prop_assert!(metrics.max_latency_ms() >= latency);
            previous = metrics.max_latency_ms();
        }
    }

    #[test]
    fn prop_average_is_exact_mean_per_service(observations in interleaved_strategy()) {
        let mut collector = MetricsCollector::new();
        for name in SERVICES {
            collector.register(name);
        }

        let mut latencies: [Vec<u32>; 3] = Default::default();
        for (idx, success, latency) in &observations {
            let request = Request::new(SERVICES[*idx], 64);
            collector.record(&request, &response(*success, *latency)).unwrap();
            latencies[*idx].push(*latency);
        }

        for (idx, name) in SERVICES.iter().enumerate() {
            let metrics = collector.metrics(name).unwrap();
            let observed = &latencies[idx];
            prop_assert_eq!(metrics.total_requests(), observed.len() as u64);

            if observed.is_empty() {
                prop_assert_eq!(metrics.average_latency_ms(), 0.0);
                prop_assert_eq!(metrics.max_latency_ms(), 0);
            } else {
                let sum: u64 = observed.iter().map(|&l| u64::from(l)).sum();
                let mean = sum as f64 / observed.len() as f64;
                prop_assert_eq!(metrics.average_latency_ms(), mean);
                prop_assert_eq!(metrics.max_latency_ms(), *observed.iter().max().unwrap());
            }
        }
    }
}

// =============================================================================
// Health Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_high_error_rate_always_unhealthy(error_rate in 0.2001f64..=1.0, latency in 0.0f64..10_000.0) {
        prop_assert_eq!(HealthEvaluator::new().classify(error_rate, latency), HealthStatus::Unhealthy);
    }

    #[test]
    fn prop_high_latency_always_unhealthy(error_rate in 0.0f64..=1.0, latency in 400.001f64..10_000.0) {
        prop_assert_eq!(HealthEvaluator::new().classify(error_rate, latency), HealthStatus::Unhealthy);
    }

    #[test]
    fn prop_low_inputs_always_healthy(error_rate in 0.0f64..=0.05, latency in 0.0f64..=150.0) {
        prop_assert_eq!(HealthEvaluator::new().classify(error_rate, latency), HealthStatus::Healthy);
    }

    #[test]
    fn prop_evaluate_matches_classify(outcomes in prop::collection::vec(outcome_strategy(), 0..100)) {
        let mut metrics = ServiceMetrics::new("alpha");
        for (success, latency) in outcomes {
            metrics.update(&response(success, latency));
        }

        let evaluator = HealthEvaluator::new();
        prop_assert_eq!(
            evaluator.evaluate(&metrics),
            evaluator.classify(metrics.error_rate(), metrics.average_latency_ms())
        );
    }
}
