//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

use super::Config;

/// Prometheus exporter for Kubernetes event counts.
#[derive(Parser, Debug, Default)]
#[command(name = "kube-event-exporter")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to an optional YAML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The address to listen on for HTTP requests.
    #[arg(long)]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long)]
    pub telemetry_path: Option<String>,

    /// Maximum time a scrape waits for the event list, in seconds.
    #[arg(long)]
    pub scrape_timeout_secs: Option<u64>,

    /// Events requested per list call (0 disables paging).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    /// Overwrite configuration values with any flags given on the command line.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(address) = &self.listen_address {
            config.server.listen_address = address.clone();
        }
        if let Some(path) = &self.telemetry_path {
            config.server.telemetry_path = path.clone();
        }
        if let Some(secs) = self.scrape_timeout_secs {
            config.collector.scrape_timeout_secs = secs;
        }
        if let Some(page_size) = self.page_size {
            config.collector.page_size = page_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let args = CliArgs::try_parse_from([
            "kube-event-exporter",
            "--listen-address",
            ":9102",
            "--scrape-timeout-secs",
            "3",
        ])
        .unwrap();

        assert_eq!(args.listen_address.as_deref(), Some(":9102"));
        assert_eq!(args.scrape_timeout_secs, Some(3));
        assert_eq!(args.telemetry_path, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_overrides_only_given_flags() {
        let args = CliArgs::try_parse_from(["kube-event-exporter", "--page-size", "0"]).unwrap();
        let mut config = Config::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.collector.page_size, 0);
        assert_eq!(config.server, Config::default().server);
        assert_eq!(config.collector.scrape_timeout_secs, 10);
    }
}
