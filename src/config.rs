//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Path to the static station dataset (JSON)
    pub data_path: PathBuf,
    /// TTL in seconds for cached query results
    pub cache_ttl: u64,
    /// Interval in seconds between purges of expired cache entries
    pub cache_cleanup_interval: u64,
    /// Interval in seconds between simulator passes
    pub simulator_interval: u64,
    /// Delay in seconds before the first simulator pass
    pub simulator_warmup: u64,
    /// Whether the live-update simulator runs at all
    pub simulator_enabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `DATA_PATH` - Station dataset path (default: data/dublinbike.json)
    /// - `CACHE_TTL` - Cached result TTL in seconds (default: 300)
    /// - `CACHE_CLEANUP_INTERVAL` - Expired entry purge frequency in seconds (default: 60)
    /// - `SIMULATOR_INTERVAL` - Seconds between simulator passes (default: 15)
    /// - `SIMULATOR_WARMUP` - Seconds before the first pass (default: 5)
    /// - `SIMULATOR_ENABLED` - Run the simulator (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            data_path: env::var("DATA_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cache_cleanup_interval: env_or("CACHE_CLEANUP_INTERVAL", defaults.cache_cleanup_interval),
            simulator_interval: env_or("SIMULATOR_INTERVAL", defaults.simulator_interval),
            simulator_warmup: env_or("SIMULATOR_WARMUP", defaults.simulator_warmup),
            simulator_enabled: env_or("SIMULATOR_ENABLED", defaults.simulator_enabled),
        }
    }

    /// Cached result TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            data_path: PathBuf::from("data/dublinbike.json"),
            cache_ttl: 300,
            cache_cleanup_interval: 60,
            simulator_interval: 15,
            simulator_warmup: 5,
            simulator_enabled: true,
        }
    }
}

/// Reads and parses an environment variable, falling back to `default`.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.data_path, PathBuf::from("data/dublinbike.json"));
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.cache_cleanup_interval, 60);
        assert_eq!(config.simulator_interval, 15);
        assert_eq!(config.simulator_warmup, 5);
        assert!(config.simulator_enabled);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("DATA_PATH");
        env::remove_var("CACHE_TTL");
        env::remove_var("CACHE_CLEANUP_INTERVAL");
        env::remove_var("SIMULATOR_INTERVAL");
        env::remove_var("SIMULATOR_WARMUP");
        env::remove_var("SIMULATOR_ENABLED");

        let config = Config::from_env();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.simulator_interval, 15);
        assert!(config.simulator_enabled);
    }

    #[test]
    fn test_env_or_unparsable_falls_back() {
        env::set_var("DUBLIN_BIKES_TEST_PORT", "not-a-number");
        assert_eq!(env_or("DUBLIN_BIKES_TEST_PORT", 8080u16), 8080);
        env::set_var("DUBLIN_BIKES_TEST_PORT", " 9090 ");
        assert_eq!(env_or("DUBLIN_BIKES_TEST_PORT", 8080u16), 9090);
        env::remove_var("DUBLIN_BIKES_TEST_PORT");
    }
}
