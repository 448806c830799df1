//! Command-line configuration of the gateway binary.

use std::time::Duration;

use clap::Parser;

use super::config::{GatewayConfig, InvalidInputPolicy};
use crate::StatsdClientOptions;

/// HTTP gateway relaying metrics to a StatsD collector.
#[derive(Parser, Debug)]
#[command(name = "statsd-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTTP host to listen on
    #[arg(long, env = "STATSD_GATEWAY_HTTP_HOST", default_value = "127.0.0.1")]
    pub http_host: String,

    /// HTTP port to listen on
    #[arg(long, env = "STATSD_GATEWAY_HTTP_PORT", default_value_t = 80)]
    pub http_port: u16,

    /// StatsD collector host
    #[arg(long, env = "STATSD_GATEWAY_STATSD_HOST", default_value = "127.0.0.1")]
    pub statsd_host: String,

    /// StatsD collector port
    #[arg(long, env = "STATSD_GATEWAY_STATSD_PORT", default_value_t = 8125)]
    pub statsd_port: u16,

    /// Secret verifying the X-JWT-Token header; empty disables the check
    #[arg(long, env = "STATSD_GATEWAY_JWT_SECRET", default_value = "", hide_env_values = true)]
    pub jwt_secret: String,

    /// Enable verbose logging
    #[arg(short, long, env = "STATSD_GATEWAY_VERBOSE")]
    pub verbose: bool,

    /// What to do after answering 400 for a malformed field
    #[arg(
        long,
        env = "STATSD_GATEWAY_INVALID_INPUT",
        value_enum,
        default_value_t = InvalidInputPolicy::Reject
    )]
    pub invalid_input: InvalidInputPolicy,

    /// Buffer metrics until the next flush instead of sending on every call
    #[arg(long, env = "STATSD_GATEWAY_BUFFERED")]
    pub buffered: bool,

    /// Periodic flush interval in milliseconds; 0 disables periodic flushing
    #[arg(long, env = "STATSD_GATEWAY_FLUSH_INTERVAL_MS", default_value_t = 1000)]
    pub flush_interval_ms: u64,

    /// Prefix prepended to every metric key
    #[arg(long, env = "STATSD_GATEWAY_STATS_PREFIX", default_value = "")]
    pub stats_prefix: String,

    /// Number of background threads writing to the collector
    #[arg(long, env = "STATSD_GATEWAY_FLUSH_WORKERS", default_value_t = 1)]
    pub flush_workers: usize,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "STATSD_GATEWAY_REQUEST_TIMEOUT_MS", default_value_t = 1000)]
    pub request_timeout_ms: u64,
}

impl Cli {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Splits the arguments into the gateway and client configurations.
    #[must_use]
    pub fn into_configs(self) -> (GatewayConfig, StatsdClientOptions) {
        let gateway = GatewayConfig {
            listen_host: self.http_host,
            listen_port: self.http_port,
            jwt_secret: Some(self.jwt_secret).filter(|secret| !secret.is_empty()),
            invalid_input: self.invalid_input,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        };

        // periodic flushing only matters when metrics are buffered
        let flush_interval = (self.buffered && self.flush_interval_ms > 0)
            .then(|| Duration::from_millis(self.flush_interval_ms));

        let client = StatsdClientOptions {
            host: self.statsd_host,
            port: self.statsd_port,
            autoflush: !self.buffered,
            stats_prefix: self.stats_prefix,
            flush_interval,
            flush_workers: self.flush_workers.max(1),
            ..StatsdClientOptions::default()
        };

        (gateway, client)
    }
}
