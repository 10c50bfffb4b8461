//! Command-line interface parsing for the Pokedex CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the cache configuration and API base URL the session starts with.

use clap::Parser;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::data::POKEAPI_BASE_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A duration flag was set to zero
    #[error("Invalid value for --{flag}: '{value}'. Must be greater than zero")]
    InvalidDuration { flag: &'static str, value: u64 },

    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Must start with http:// or https://")]
    InvalidBaseUrl(String),
}

/// Pokedex CLI - Explore the PokeAPI catalog from an interactive prompt
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive pokedex explorer with a TTL response cache")]
#[command(version)]
pub struct Cli {
    /// Seconds a cached response stays valid
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    pub ttl_secs: u64,

    /// Milliseconds between cache eviction sweeps
    #[arg(long, value_name = "MILLIS", default_value_t = 500)]
    pub reap_interval_ms: u64,

    /// Seconds before a request to the API is abandoned
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Base URL of the PokeAPI
    #[arg(long, value_name = "URL", default_value = POKEAPI_BASE_URL)]
    pub base_url: String,

    /// Log cache hits, misses and evictions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Cache TTL, reaper tick and request timeout
    pub cache: CacheConfig,
    /// Base URL every request key is built from
    pub base_url: String,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            base_url: POKEAPI_BASE_URL.to_string(),
            verbose: false,
        }
    }
}

fn non_zero(flag: &'static str, value: u64) -> Result<u64, CliError> {
    if value == 0 {
        return Err(CliError::InvalidDuration { flag, value });
    }
    Ok(value)
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if a duration is zero or the base URL is not http(s)
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let ttl = non_zero("ttl-secs", cli.ttl_secs)?;
        let reap_interval = non_zero("reap-interval-ms", cli.reap_interval_ms)?;
        let timeout = non_zero("timeout-secs", cli.timeout_secs)?;

        if !(cli.base_url.starts_with("http://") || cli.base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl),
                reap_interval: Duration::from_millis(reap_interval),
                request_timeout: Duration::from_secs(timeout),
            },
            base_url: cli.base_url.clone(),
            verbose: cli.verbose,
        })
    }
}
