//! The aggregating event collector.
//!
//! Each call to [`EventCollector::collect`] performs a fresh, full fetch from
//! the event lister and reduces the records into one gauge sample per distinct
//! `(reason, type, involvedObjectKind)`. Nothing is carried over between
//! calls, so concurrent scrapes never observe each other's state.

mod aggregate;

pub use aggregate::{AggregationKey, AggregationTable};

use snafu::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::CollectorConfig;
use crate::error::{CollectError, FetchSnafu, TimeoutSnafu};
use crate::lister::{EventLister, EventListerRef};

/// Name of the emitted gauge.
pub const EVENT_COUNT_NAME: &str = "event_count_total";

/// Help text of the emitted gauge.
pub const EVENT_COUNT_HELP: &str = "The total number of events currently reported by kubernetes.";

/// Variable label names, in emission order.
pub const EVENT_COUNT_LABELS: [&str; 3] = ["reason", "type", "involvedObjectKind"];

/// Kind of value a descriptor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
}

/// Static declaration of a metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub label_names: [&'static str; 3],
}

impl MetricDescriptor {
    /// The `event_count_total` gauge declaration.
    pub fn event_count() -> Self {
        Self {
            name: EVENT_COUNT_NAME,
            help: EVENT_COUNT_HELP,
            kind: MetricKind::Gauge,
            label_names: EVENT_COUNT_LABELS,
        }
    }
}

/// One emitted gauge sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub descriptor: Arc<MetricDescriptor>,
    pub labels: AggregationKey,
    pub value: f64,
}

impl MetricSample {
    /// Label pairs in the descriptor's label order.
    pub fn label_pairs(&self) -> [(&'static str, &str); 3] {
        let [reason, type_, kind] = self.descriptor.label_names;
        [
            (reason, self.labels.reason.as_str()),
            (type_, self.labels.type_.as_str()),
            (kind, self.labels.involved_object_kind.as_str()),
        ]
    }
}

/// Result of a successful collection.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Number of records returned by the lister.
    pub records: usize,
    /// One sample per distinct key, in unspecified order.
    pub samples: Vec<MetricSample>,
}

/// Collector turning the cluster's events into `event_count_total` samples.
pub struct EventCollector {
    descriptor: Arc<MetricDescriptor>,
    lister: EventListerRef,
    timeout: Duration,
}

impl EventCollector {
    /// Create a collector that bounds every fetch by `timeout`.
    pub fn new(lister: impl EventLister + 'static, timeout: Duration) -> Self {
        Self {
            descriptor: Arc::new(MetricDescriptor::event_count()),
            lister: Arc::new(lister),
            timeout,
        }
    }

    pub fn from_config(lister: impl EventLister + 'static, config: &CollectorConfig) -> Self {
        Self::new(lister, config.scrape_timeout())
    }

    /// The single descriptor this collector emits. Never fails.
    pub fn describe(&self) -> &MetricDescriptor {
        &self.descriptor
    }

    /// Shared handle to the descriptor, for encoders that outlive a borrow.
    pub fn descriptor_handle(&self) -> Arc<MetricDescriptor> {
        Arc::clone(&self.descriptor)
    }

    /// Fetch all events and aggregate them.
    ///
    /// # Errors
    ///
    /// Fails the whole collection, producing no samples, if the lister
    /// returns an error or does not answer within the timeout.
    pub async fn collect(&self) -> Result<Collection, CollectError> {
        let start = Instant::now();

        let records = tokio::time::timeout(self.timeout, self.lister.list())
            .await
            .map_err(|_| {
                TimeoutSnafu {
                    timeout: self.timeout,
                }
                .build()
            })?
            .context(FetchSnafu)?;

        let table = AggregationTable::from_records(&records);
        let samples: Vec<MetricSample> = table
            .into_iter()
            .map(|(labels, total)| MetricSample {
                descriptor: Arc::clone(&self.descriptor),
                labels,
                value: total as f64,
            })
            .collect();

        debug!(
            records = records.len(),
            samples = samples.len(),
            duration_ms = start.elapsed().as_millis(),
            "Collected events"
        );

        Ok(Collection {
            records: records.len(),
            samples,
        })
    }
}
