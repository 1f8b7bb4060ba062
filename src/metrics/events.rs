//! Internal events for exporter self-telemetry.
//!
//! Each event struct represents a measurable occurrence in the scrape path.
//! Events implement the `InternalEvent` trait, which records the event into
//! the [`Telemetry`] handles passed to it.

use std::time::Duration;
use tracing::trace;

use super::Telemetry;

/// Trait for internal events that can be recorded as metrics.
pub trait InternalEvent {
    /// Record this event.
    fn emit(self, telemetry: &Telemetry);
}

/// How a scrape ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Success,
    Timeout,
    Error,
}

impl ScrapeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeOutcome::Success => "success",
            ScrapeOutcome::Timeout => "timeout",
            ScrapeOutcome::Error => "error",
        }
    }
}

/// Event emitted when a scrape collected and aggregated events.
pub struct ScrapeCompleted {
    pub records: usize,
    pub duration: Duration,
}

impl InternalEvent for ScrapeCompleted {
    fn emit(self, telemetry: &Telemetry) {
        trace!(
            records = self.records,
            duration_ms = self.duration.as_millis(),
            "Scrape completed"
        );
        telemetry.record_scrape(ScrapeOutcome::Success, self.duration);
        telemetry
            .events_listed
            .set(i64::try_from(self.records).unwrap_or(i64::MAX));
    }
}

/// Event emitted when a scrape failed before any sample was produced.
pub struct ScrapeFailed {
    pub outcome: ScrapeOutcome,
    pub duration: Duration,
}

impl InternalEvent for ScrapeFailed {
    fn emit(self, telemetry: &Telemetry) {
        trace!(
            outcome = self.outcome.as_str(),
            duration_ms = self.duration.as_millis(),
            "Scrape failed"
        );
        telemetry.record_scrape(self.outcome, self.duration);
    }
}
