//! Error types for the event exporter using snafu.
//!
//! Startup errors (`ConfigError`, `ListerError`, `ServerError`) are fatal and
//! surface through `ExporterError` from `main`. Scrape-time errors
//! (`ListError`, `CollectError`, `ScrapeError`) fail a single scrape and are
//! answered with a non-2xx response.

use snafu::prelude::*;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

// ============ Config Errors ============

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML: {source}"))]
    YamlParse { source: serde_yaml::Error },

    /// Listen address is not `host:port` or `:port`.
    #[snafu(display("Invalid listen address '{address}'"))]
    InvalidListenAddress { address: String },

    /// Telemetry path must be absolute and must not shadow `/health`.
    #[snafu(display("Invalid telemetry path '{path}': {reason}"))]
    InvalidTelemetryPath { path: String, reason: String },

    /// A zero timeout would fail every scrape.
    #[snafu(display("Scrape timeout must be greater than zero"))]
    ZeroScrapeTimeout,
}

// ============ Lister Errors ============

/// Errors that can occur while establishing the event source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ListerError {
    /// No usable kubeconfig or in-cluster credentials.
    #[snafu(display("Failed to create Kubernetes client: {source}"))]
    ClientInit { source: kube::Error },
}

/// Errors returned by an event lister while fetching events.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ListError {
    /// The Kubernetes API rejected or failed the list request.
    #[snafu(display("Failed to list events: {source}"))]
    Api { source: kube::Error },
}

// ============ Collect Errors ============

/// Errors that fail a single collection. No samples are produced.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CollectError {
    /// The event lister returned an error.
    #[snafu(display("Event fetch failed: {source}"))]
    Fetch { source: ListError },

    /// The event lister did not answer within the scrape timeout.
    #[snafu(display("Event fetch timed out after {}s", timeout.as_secs_f64()))]
    Timeout { timeout: Duration },
}

/// Errors that fail a scrape request.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ScrapeError {
    /// Collection failed.
    #[snafu(display("{source}"))]
    Collect { source: CollectError },

    /// OpenMetrics encoding failed.
    #[snafu(display("Failed to encode metrics"))]
    Encode { source: std::fmt::Error },
}

// ============ Server Errors ============

/// Errors that can occur while running the scrape server.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ServerError {
    /// Failed to bind the listen address.
    #[snafu(display("Failed to bind {address}: {source}"))]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },

    /// The HTTP server terminated with an error.
    #[snafu(display("Scrape server error: {source}"))]
    Serve { source: std::io::Error },
}

// ============ Exporter Errors ============

/// Top-level error returned from the exporter's entry point.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExporterError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// The event source could not be established.
    #[snafu(display("Event source setup failed"))]
    Lister { source: ListerError },

    /// Scrape server error.
    #[snafu(display("Server error"))]
    Server { source: ServerError },
}
