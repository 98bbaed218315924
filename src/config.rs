//! Configuration Module
//!
//! Startup configuration read from command-line flags, falling back to
//! environment variables and then to defaults.

use std::num::NonZeroUsize;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

/// Server configuration parameters.
///
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lru_ttl_cache",
    version,
    about = "In-memory key/value cache server with LRU eviction and TTL expiration"
)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "SERVER_HOST_PORT", default_value = "localhost:8080")]
    pub server_host_port: String,

    /// Maximum number of entries the cache holds
    #[arg(long, env = "CACHE_SIZE", default_value = "10")]
    pub cache_size: NonZeroUsize,

    /// TTL applied when a request supplies none (e.g. "30s", "1m", "1h 30m")
    #[arg(
        long,
        env = "DEFAULT_CACHE_TTL",
        default_value = "1m",
        value_parser = parse_positive_duration
    )]
    pub default_cache_ttl: Duration,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: LevelFilter,
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// Exits the process with a usage message on invalid input.
    pub fn load() -> Self {
        Self::parse()
    }
}

fn parse_positive_duration(raw: &str) -> Result<Duration, String> {
    let ttl = humantime::parse_duration(raw).map_err(|e| e.to_string())?;
    if ttl.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(ttl)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host_port: "localhost:8080".to_string(),
            cache_size: NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN),
            default_cache_ttl: Duration::from_secs(60),
            log_level: LevelFilter::WARN,
        }
    }
}
