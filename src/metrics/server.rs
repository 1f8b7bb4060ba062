//! HTTP scrape server.
//!
//! Exposes:
//! - the telemetry path (default `/metrics`): event counts plus exporter
//!   telemetry in OpenMetrics text format
//! - `/health`: liveness check (returns 200 OK)
//!
//! Every request to the telemetry path runs a full collection. A failed
//! collection is answered with a non-2xx status so the scrape is marked
//! failed, and the server keeps serving.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use snafu::prelude::*;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::Telemetry;
use super::events::{ScrapeCompleted, ScrapeFailed, ScrapeOutcome};
use crate::collector::EventCollector;
use crate::config::HEALTH_PATH;
use crate::error::{
    BindSnafu, CollectError, CollectSnafu, EncodeSnafu, ScrapeError, ServeSnafu, ServerError,
};
use crate::exposition::{self, OPENMETRICS_CONTENT_TYPE};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    collector: Arc<EventCollector>,
    telemetry: Telemetry,
}

impl AppState {
    pub fn new(collector: Arc<EventCollector>, telemetry: Telemetry) -> Self {
        Self {
            collector,
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }
}

/// Build the router serving `telemetry_path` and `/health`.
pub fn router(state: AppState, telemetry_path: &str) -> Router {
    let descriptor = state.collector.describe();
    info!(
        metric = descriptor.name,
        labels = ?descriptor.label_names,
        telemetry_path,
        "Registered event collector"
    );

    Router::new()
        .route(telemetry_path, get(metrics_handler))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(state)
}

/// Bind `addr` and serve `router` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(
    addr: SocketAddr,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .context(BindSnafu { address: addr })?;

    info!(%addr, "Scrape server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context(ServeSnafu)?;

    info!("Scrape server stopped");
    Ok(())
}

/// Handler for the telemetry path.
async fn metrics_handler(State(state): State<AppState>) -> Result<Response, ScrapeError> {
    let start = Instant::now();

    let collection = match state.collector.collect().await {
        Ok(collection) => collection,
        Err(source) => {
            let outcome = match source {
                CollectError::Timeout { .. } => ScrapeOutcome::Timeout,
                CollectError::Fetch { .. } => ScrapeOutcome::Error,
            };
            warn!(error = %source, outcome = outcome.as_str(), "Scrape failed");
            state.telemetry.emit(ScrapeFailed {
                outcome,
                duration: start.elapsed(),
            });
            return Err(source).context(CollectSnafu);
        }
    };

    state.telemetry.emit(ScrapeCompleted {
        records: collection.records,
        duration: start.elapsed(),
    });

    let descriptor = state.collector.descriptor_handle();
    let body = exposition::encode(&descriptor, collection.samples, &state.telemetry)
        .context(EncodeSnafu)?;

    Ok(([(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body).into_response())
}

/// Handler for `/health` endpoint.
async fn health_handler() -> &'static str {
    "ok\n"
}

impl ScrapeError {
    /// HTTP status a failed scrape is answered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScrapeError::Collect {
                source: CollectError::Timeout { .. },
            } => StatusCode::GATEWAY_TIMEOUT,
            ScrapeError::Collect {
                source: CollectError::Fetch { .. },
            } => StatusCode::BAD_GATEWAY,
            ScrapeError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Failed to render scrape");
        }
        (status, format!("{self}\n")).into_response()
    }
}
