//! Service Health Pipeline Integration Tests
//!
//! Tests the pipeline end to end through the public API:
//! - Feature 1: Metrics aggregation and notification
//! - Feature 2: Health evaluation
//! - Feature 3: Alerting
//! - Feature 4: Simulation driver

use std::sync::Arc;

use assert_matches::assert_matches;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use svcpulse::{
    AlertConfig, AlertKind, AlertManager, Error, HealthEvaluator, HealthStatus, MetricsCollector,
    Request, Response, ServiceKind, ServiceMetrics, SimulatedService, Simulation,
    SimulationConfig,
};

fn failure(latency_ms: u32) -> Response {
    Response::failure(latency_ms, "ERR_TEST", "test failure")
}

// =============================================================================
// Feature 1: Metrics Aggregation Tests
// =============================================================================

mod metrics_tests {
    use super::*;

    #[test]
    fn test_counters_after_every_record() {
        let mut collector = MetricsCollector::new();
        collector.register("FastService");

        let request = Request::new("FastService", 100);
        let responses = [
            Response::success(45),
            failure(52),
            Response::success(61),
            failure(40),
            Response::success(55),
        ];

        for response in &responses {
            let m = collector.record(&request, response).unwrap();
            assert_eq!(
                m.total_requests(),
                m.successful_requests() + m.failed_requests()
            );
        }

        let m = collector.metrics("FastService").unwrap();
        assert_eq!(m.total_requests(), 5);
        assert_eq!(m.failed_requests(), 2);
        assert_eq!(m.average_latency_ms(), 50.6);
        assert_eq!(m.max_latency_ms(), 61);
    }

    #[test]
    fn test_duplicate_registration_keeps_metrics() {
        let mut collector = MetricsCollector::new();
        let fast = SimulatedService::fast();
        collector.register_service(&fast);

        let request = Request::new(fast.name(), 100);
        collector.record(&request, &Response::success(50)).unwrap();
        collector.record(&request, &failure(70)).unwrap();
        let before = collector.metrics(fast.name()).unwrap().clone();

        assert!(!collector.register_service(&fast));
        assert_eq!(collector.metrics(fast.name()).unwrap(), &before);
    }

    #[test]
    fn test_unknown_service_is_explicit() {
        let mut collector = MetricsCollector::new();
        collector.register("FastService");

        let result = collector.record(&Request::new("Nope", 1), &Response::success(1));
        assert_matches!(result, Err(Error::UnknownService { .. }));
        assert_eq!(collector.service_count(), 1);
    }

    #[test]
    fn test_notification_order_across_subscribers() {
        let mut collector = MetricsCollector::new();
        collector.register("FastService");
        collector.register("SlowService");

        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        for tag in ["a", "b"] {
            let log = Arc::clone(&log);
            collector.subscribe(Arc::new(move |m: &ServiceMetrics| {
                log.lock().push(format!("{}:{}", tag, m.service_name()));
            }));
        }

        collector
            .record(&Request::new("SlowService", 1), &Response::success(200))
            .unwrap();
        collector
            .record(&Request::new("FastService", 1), &Response::success(50))
            .unwrap();

        assert_eq!(
            *log.lock(),
            vec!["a:SlowService", "b:SlowService", "a:FastService", "b:FastService"]
        );
    }
}

// =============================================================================
// Feature 2: Health Evaluation Tests
// =============================================================================

mod health_tests {
    use super::*;

    #[test]
    fn test_reference_points() {
        let evaluator = HealthEvaluator::new();

        assert_eq!(evaluator.classify(0.0, 100.0), HealthStatus::Healthy);
        assert_eq!(evaluator.classify(0.10, 100.0), HealthStatus::Degraded);
        assert_eq!(evaluator.classify(0.30, 0.0), HealthStatus::Unhealthy);
        assert_eq!(evaluator.classify(0.30, 1_000.0), HealthStatus::Unhealthy);
        assert_eq!(evaluator.classify(0.0, 500.0), HealthStatus::Unhealthy);
        assert_eq!(evaluator.classify(0.15, 500.0), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_order_independent() {
        let mut forward = ServiceMetrics::new("svc");
        let mut backward = ServiceMetrics::new("svc");
        let responses = vec![Response::success(100), failure(300), Response::success(120)];

        for r in &responses {
            forward.update(r);
        }
        for r in responses.iter().rev() {
            backward.update(r);
        }

        let evaluator = HealthEvaluator::new();
        assert_eq!(evaluator.evaluate(&forward), evaluator.evaluate(&backward));
    }
}

// =============================================================================
// Feature 3: Alerting Tests
// =============================================================================

mod alerting_tests {
    use super::*;

    fn wired(config: AlertConfig) -> (MetricsCollector, Arc<AlertManager>) {
        let alerts = Arc::new(AlertManager::new(config));
        let mut collector = MetricsCollector::new();
        collector.register("FastService");
        collector.subscribe(alerts.clone());
        (collector, alerts)
    }

    #[test]
    fn test_silent_below_min_requests() {
        let (mut collector, alerts) = wired(AlertConfig::default());
        let request = Request::new("FastService", 1);

        for _ in 0..4 {
            collector.record(&request, &failure(50)).unwrap();
        }
        assert!(alerts.is_empty());

        collector.record(&request, &failure(50)).unwrap();
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn test_first_breach_with_three_requests() {
        let (mut collector, alerts) = wired(AlertConfig {
            error_threshold: 0.1,
            min_requests: 3,
        });
        let request = Request::new("FastService", 1);

        collector.record(&request, &Response::success(50)).unwrap();
        collector.record(&request, &Response::success(50)).unwrap();
        assert!(alerts.is_empty());

        collector.record(&request, &failure(50)).unwrap();

        let error_alerts: Vec<_> = alerts
            .alerts()
            .into_iter()
            .filter(|a| a.kind == AlertKind::HighErrorRate)
            .collect();
        assert_eq!(error_alerts.len(), 1);
        assert!(error_alerts[0].message.contains("33.3%"));
    }

    #[test]
    fn test_two_alerts_in_one_update() {
        let (mut collector, alerts) = wired(AlertConfig {
            error_threshold: 0.1,
            min_requests: 3,
        });
        let request = Request::new("FastService", 1);

        collector.record(&request, &failure(50)).unwrap();
        collector.record(&request, &failure(50)).unwrap();
        collector.record(&request, &failure(50)).unwrap();

        let log = alerts.alerts();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].kind, AlertKind::HighErrorRate);
        assert_eq!(log[0].message, "High error rate: 100.0% (> 10.0%)");
        assert_eq!(log[1].kind, AlertKind::Unhealthy);
        assert_eq!(log[1].message, "Service status: UNHEALTHY");
        assert!(log[1].to_string().contains("ALERT [FastService]: Service status: UNHEALTHY"));
    }

    #[test]
    fn test_alert_log_is_append_only() {
        let (mut collector, alerts) = wired(AlertConfig {
            error_threshold: 0.1,
            min_requests: 1,
        });
        let request = Request::new("FastService", 1);

        collector.record(&request, &failure(50)).unwrap();
        let first = alerts.alerts();

        for _ in 0..20 {
            collector.record(&request, &Response::success(50)).unwrap();
        }

        let later = alerts.alerts();
        assert!(later.len() >= first.len());
        assert_eq!(&later[..first.len()], &first[..]);
    }
}

// =============================================================================
// Feature 4: Simulation Driver Tests
// =============================================================================

mod simulation_tests {
    use super::*;

    #[test]
    fn test_default_run() {
        let mut simulation = Simulation::new(SimulationConfig {
            seed: Some(2024),
            ..Default::default()
        })
        .unwrap();

        let report = simulation.run();
        assert_eq!(report.requests_processed, 80);
        assert_eq!(report.checkpoints.len(), 4);
        assert_eq!(report.services.len(), 2);

        for summary in &report.services {
            assert_eq!(
                summary.total_requests,
                summary.successful_requests + summary.failed_requests
            );
        }

        // Every alert comes from a registered service
        for alert in &report.alerts {
            assert!(alert.service_name == "FastService" || alert.service_name == "SlowService");
        }
    }

    #[test]
    fn test_checkpoints_grow_monotonically() {
        let mut simulation = Simulation::new(SimulationConfig {
            seed: Some(99),
            ..Default::default()
        })
        .unwrap();

        let report = simulation.run();
        let totals: Vec<u64> = report
            .checkpoints
            .iter()
            .map(|c| c.services.iter().map(|s| s.total_requests).sum())
            .collect();
        assert_eq!(totals, vec![20, 40, 60, 80]);
    }

    #[test]
    fn test_always_failing_service_alerts() {
        let mut profile = ServiceKind::Fast.profile();
        profile.name = "Broken".to_string();
        profile.failure_probability = 1.0;
        let broken = SimulatedService::from_profile(profile).unwrap();

        let mut simulation = Simulation::with_services(
            SimulationConfig {
                request_count: 10,
                summary_interval: 5,
                seed: Some(1),
                ..Default::default()
            },
            vec![broken],
        )
        .unwrap();

        let report = simulation.run();
        assert_eq!(report.services[0].health, HealthStatus::Unhealthy);
        // Requests 3..=10 each raise an error-rate and an unhealthy alert
        assert_eq!(report.alerts.len(), 16);
    }

    #[test]
    fn test_service_process_is_reproducible() {
        let service = SimulatedService::slow();
        let request = Request::new(service.name(), 256);

        let mut a = StdRng::seed_from_u64(8);
        let mut b = StdRng::seed_from_u64(8);
        let left: Vec<_> = (0..10).map(|_| service.process(&request, &mut a)).collect();
        let right: Vec<_> = (0..10).map(|_| service.process(&request, &mut b)).collect();
        assert_eq!(left, right);
    }
}
