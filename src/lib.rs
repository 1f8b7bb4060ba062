//! kube-event-exporter: Prometheus exporter for Kubernetes event counts.
//!
//! On every scrape the exporter lists all core/v1 events in the cluster,
//! groups them by `(reason, type, involvedObjectKind)` and reports the summed
//! event `count` of each group as the `event_count_total` gauge.
//!
//! # Example
//!
//! ```ignore
//! use kube_event_exporter::{EventCollector, KubeEventLister, Telemetry};
//! use kube_event_exporter::metrics::{AppState, router, serve};
//!
//! let lister = KubeEventLister::try_default(500).await?;
//! let collector = Arc::new(EventCollector::new(lister, Duration::from_secs(10)));
//! let app = router(AppState::new(collector, Telemetry::new()), "/metrics");
//! serve(addr, app, shutdown_signal()).await?;
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod exposition;
pub mod lister;
pub mod logging;
pub mod metrics;
pub mod signal;

// Re-export main types
pub use collector::{Collection, EventCollector, MetricDescriptor, MetricSample};
pub use config::{CliArgs, Config};
pub use event::EventRecord;
pub use lister::{EventLister, KubeEventLister};
pub use metrics::Telemetry;
pub use signal::shutdown_signal;
