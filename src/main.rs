//! kube-event-exporter CLI: serves Kubernetes event counts to Prometheus.

use clap::Parser;
use snafu::prelude::*;
use std::sync::Arc;
use tracing::info;

use kube_event_exporter::error::{ConfigSnafu, ExporterError, ListerSnafu, ServerSnafu};
use kube_event_exporter::logging::init_tracing;
use kube_event_exporter::metrics::{AppState, router, serve};
use kube_event_exporter::{
    CliArgs, Config, EventCollector, KubeEventLister, Telemetry, shutdown_signal,
};

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), ExporterError> {
    let args = CliArgs::parse();
    init_tracing(&args.log_level);

    let config = Config::load(&args).context(ConfigSnafu)?;
    let addr = config.server.socket_addr().context(ConfigSnafu)?;

    info!(
        listen_address = %addr,
        telemetry_path = %config.server.telemetry_path,
        scrape_timeout_secs = config.collector.scrape_timeout_secs,
        page_size = config.collector.page_size,
        "kube-event-exporter starting"
    );

    let lister = KubeEventLister::try_default(config.collector.page_size)
        .await
        .context(ListerSnafu)?;
    let collector = Arc::new(EventCollector::from_config(lister, &config.collector));

    let state = AppState::new(collector, Telemetry::new());
    let app = router(state, &config.server.telemetry_path);

    serve(addr, app, shutdown_signal())
        .await
        .context(ServerSnafu)?;

    info!("kube-event-exporter stopped");
    Ok(())
}
