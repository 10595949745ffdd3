//! svcpulse
//!
//! Runs the service health simulation and prints periodic summaries, the
//! final metrics and the alert log.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │   Services   │───▶│ MetricsCollector │───▶│   Alerting   │
//! │ (Fast/Slow)  │    │                  │    │              │
//! └──────────────┘    └──────────────────┘    └──────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use svcpulse::adapters::{LoggingSubscriber, PrometheusExporter};
use svcpulse::simulation::{render_alerts, render_summaries};
use svcpulse::{AlertConfig, Simulation, SimulationConfig};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Service health simulation - metrics, health tiers and alerting
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of requests to generate
    #[arg(long, env = "SVCPULSE_REQUESTS", default_value = "80")]
    requests: usize,

    /// Print a summary after every N requests
    #[arg(long, env = "SVCPULSE_SUMMARY_INTERVAL", default_value = "20")]
    summary_interval: usize,

    /// RNG seed for a reproducible run
    #[arg(long, env = "SVCPULSE_SEED")]
    seed: Option<u64>,

    /// Error rate above which an alert is raised
    #[arg(long, env = "SVCPULSE_ALERT_ERROR_THRESHOLD", default_value = "0.1")]
    alert_error_threshold: f64,

    /// Requests a service needs before alerting evaluates it
    #[arg(long, env = "SVCPULSE_ALERT_MIN_REQUESTS", default_value = "3")]
    alert_min_requests: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Print the final report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Append the Prometheus text exposition of the final metrics
    #[arg(long)]
    prometheus: bool,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            request_count: self.requests,
            summary_interval: self.summary_interval,
            seed: self.seed,
            alert: AlertConfig {
                error_threshold: self.alert_error_threshold,
                min_requests: self.alert_min_requests,
            },
            ..Default::default()
        }
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting service health simulation");
    info!("  Requests: {}", args.requests);
    info!("  Summary interval: {}", args.summary_interval);
    info!(
        "  Alert threshold: {:.1}% after {} requests",
        args.alert_error_threshold * 100.0,
        args.alert_min_requests
    );

    let mut simulation =
        Simulation::new(args.simulation_config()).context("invalid simulation configuration")?;
    simulation.subscribe(Arc::new(LoggingSubscriber::debug_level()));

    let exporter = if args.prometheus {
        let exporter = Arc::new(PrometheusExporter::new()?);
        simulation.subscribe(exporter.clone());
        Some(exporter)
    } else {
        None
    };

    let text_output = !args.json;
    let report = simulation.run_with(|checkpoint| {
        if text_output {
            println!("\n--- Interim metrics ({} requests) ---", checkpoint.processed);
            println!("{}", render_summaries(&checkpoint.services));
        }
    });

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("\n=== FINAL METRICS ===");
        println!("{}", render_summaries(&report.services));

        println!("\n=== ALERTS ===");
        println!("{}", render_alerts(&report.alerts));
    }

    if let Some(exporter) = exporter {
        println!("\n{}", exporter.export_text()?);
    }

    info!("Simulation finished");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so the report on stdout stays clean.
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
