//! Configuration loading and validation.
//!
//! Configuration comes from three layers, highest precedence first: command
//! line flags, an optional YAML file (with environment variable
//! interpolation), and built-in defaults.

mod cli;
mod vars;

pub use cli::CliArgs;
pub use vars::interpolate;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use crate::error::{
    ConfigError, EnvInterpolationSnafu, InvalidListenAddressSnafu, InvalidTelemetryPathSnafu,
    ReadFileSnafu, YamlParseSnafu, ZeroScrapeTimeoutSnafu,
};

/// Path of the liveness endpoint; the telemetry path may not shadow it.
pub const HEALTH_PATH: &str = "/health";

/// Top-level exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
}

/// Scrape endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on, `host:port` or `:port` (default: ":8080").
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Path metrics are served on (default: "/metrics").
    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

impl ServerConfig {
    /// Resolve the listen address to a socket address.
    ///
    /// A bare `:port` binds all IPv4 interfaces.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_listen_address(&self.listen_address)
    }
}

fn default_listen_address() -> String {
    ":8080".to_string()
}

fn default_telemetry_path() -> String {
    "/metrics".to_string()
}

/// Event collection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    /// Upper bound on a single event fetch, in seconds (default: 10).
    #[serde(default = "default_scrape_timeout_secs")]
    pub scrape_timeout_secs: u64,
    /// Events requested per list call; 0 fetches everything at once (default: 500).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            scrape_timeout_secs: default_scrape_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl CollectorConfig {
    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }
}

fn default_scrape_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    500
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        Self::parse(&contents)
    }

    /// Parse YAML configuration after interpolating environment variables.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let result = interpolate(yaml);
        ensure!(
            result.is_ok(),
            EnvInterpolationSnafu {
                message: result.errors.join("\n"),
            }
        );
        serde_yaml::from_str(&result.text).context(YamlParseSnafu)
    }

    /// Build the effective configuration for the given command line.
    ///
    /// Reads the file named by `--config` if any, then applies flag overrides
    /// and validates the result.
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        args.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that cannot work at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        let path = &self.server.telemetry_path;
        ensure!(
            path.starts_with('/'),
            InvalidTelemetryPathSnafu {
                path,
                reason: "must start with '/'",
            }
        );
        ensure!(
            path != "/" && path != HEALTH_PATH,
            InvalidTelemetryPathSnafu {
                path,
                reason: "conflicts with another endpoint",
            }
        );

        ensure!(self.collector.scrape_timeout_secs > 0, ZeroScrapeTimeoutSnafu);
        Ok(())
    }
}

/// Parse a listen address of the form `host:port` or `:port`.
pub fn parse_listen_address(address: &str) -> Result<SocketAddr, ConfigError> {
    let normalized = match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => address.to_string(),
    };

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    normalized
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .context(InvalidListenAddressSnafu { address })
}
