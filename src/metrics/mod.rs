//! Exporter self-telemetry and the scrape server.
//!
//! - `events`: Internal event types and the `InternalEvent` trait
//! - `server`: axum HTTP server for the metrics and health endpoints

pub mod events;
pub mod server;

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;
use std::time::Duration;

use events::{InternalEvent, ScrapeOutcome};

pub use server::{AppState, router, serve};

/// Histogram buckets for scrape duration (in seconds).
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

type OutcomeLabels = [(&'static str, &'static str); 1];

/// Metrics the exporter reports about itself.
///
/// Handles are shared: clones record into the same underlying values, so a
/// `Telemetry` can be registered into a fresh registry on every scrape.
#[derive(Debug, Clone)]
pub struct Telemetry {
    scrapes: Family<OutcomeLabels, Counter>,
    scrape_duration: Histogram,
    events_listed: Gauge,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            scrapes: Family::default(),
            scrape_duration: Histogram::new(DURATION_BUCKETS.iter().copied()),
            events_listed: Gauge::default(),
        }
    }

    /// Record an internal event.
    pub fn emit(&self, event: impl InternalEvent) {
        event.emit(self);
    }

    /// Register all handles into `registry`.
    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "event_exporter_scrapes",
            "Scrapes handled by the exporter, by outcome",
            self.scrapes.clone(),
        );
        registry.register(
            "event_exporter_scrape_duration_seconds",
            "Time spent collecting events for a scrape",
            self.scrape_duration.clone(),
        );
        registry.register(
            "event_exporter_events_listed",
            "Event records returned by the last successful fetch",
            self.events_listed.clone(),
        );
    }

    /// Number of scrapes recorded with `outcome`.
    pub fn scrape_count(&self, outcome: ScrapeOutcome) -> u64 {
        self.scrapes
            .get_or_create(&[("outcome", outcome.as_str())])
            .get()
    }

    pub fn events_listed(&self) -> i64 {
        self.events_listed.get()
    }

    fn record_scrape(&self, outcome: ScrapeOutcome, duration: Duration) {
        self.scrapes
            .get_or_create(&[("outcome", outcome.as_str())])
            .inc();
        self.scrape_duration.observe(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::events::{ScrapeCompleted, ScrapeFailed};
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn test_scrape_outcomes_are_counted() {
        let telemetry = Telemetry::new();

        telemetry.emit(ScrapeCompleted {
            records: 12,
            duration: Duration::from_millis(20),
        });
        telemetry.emit(ScrapeFailed {
            outcome: ScrapeOutcome::Timeout,
            duration: Duration::from_secs(10),
        });

        assert_eq!(telemetry.scrape_count(ScrapeOutcome::Success), 1);
        assert_eq!(telemetry.scrape_count(ScrapeOutcome::Timeout), 1);
        assert_eq!(telemetry.scrape_count(ScrapeOutcome::Error), 0);
        assert_eq!(telemetry.events_listed(), 12);
    }

    #[test]
    fn test_failed_scrape_keeps_last_events_listed() {
        let telemetry = Telemetry::new();

        telemetry.emit(ScrapeCompleted {
            records: 4,
            duration: Duration::from_millis(5),
        });
        telemetry.emit(ScrapeFailed {
            outcome: ScrapeOutcome::Error,
            duration: Duration::from_millis(5),
        });

        assert_eq!(telemetry.events_listed(), 4);
    }

    #[test]
    fn test_clones_share_values() {
        let telemetry = Telemetry::new();
        let clone = telemetry.clone();

        clone.emit(ScrapeCompleted {
            records: 1,
            duration: Duration::from_millis(1),
        });

        assert_eq!(telemetry.scrape_count(ScrapeOutcome::Success), 1);
    }

    #[test]
    fn test_register_and_encode() {
        let telemetry = Telemetry::new();
        telemetry.emit(ScrapeCompleted {
            records: 3,
            duration: Duration::from_millis(7),
        });

        let mut registry = Registry::default();
        telemetry.register(&mut registry);
        let mut output = String::new();
        encode(&mut output, &registry).unwrap();

        assert!(output.contains("event_exporter_scrapes_total{outcome=\"success\"} 1"));
        assert!(output.contains("event_exporter_events_listed 3"));
        assert!(output.contains("event_exporter_scrape_duration_seconds_count 1"));
    }
}
