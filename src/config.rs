//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Signing secret used when `JWT_SECRET` is not set. Only suitable for local runs.
pub const DEV_JWT_SECRET: &str = "property-catalog-dev-secret";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds applied to every populated cache entry
    pub cache_ttl: u64,
    /// Prefix for every cache key produced by the key builder
    pub cache_namespace: String,
    /// Redis connection string; the in-process cache is used when absent
    pub redis_url: Option<String>,
    /// Maximum number of entries the in-process cache can hold
    pub max_entries: usize,
    /// In-process cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Per-call cache backend timeout in milliseconds
    pub cache_timeout_ms: u64,
    /// Per-call backing store timeout in milliseconds
    pub store_timeout_ms: u64,
    /// Token signing secret
    pub jwt_secret: String,
    /// Lifetime of issued tokens in hours
    pub token_ttl_hours: i64,
    /// bcrypt cost factor for new password hashes (4 to 31)
    pub password_hash_cost: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL` - Cache entry TTL in seconds (default: 300)
    /// - `CACHE_NAMESPACE` - Cache key namespace (default: "properties")
    /// - `REDIS_URL` - Redis connection string (default: unset, in-process cache)
    /// - `MAX_ENTRIES` - In-process cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - In-process sweep frequency in seconds (default: 30)
    /// - `CACHE_TIMEOUT_MS` - Cache call timeout (default: 250)
    /// - `STORE_TIMEOUT_MS` - Store call timeout (default: 5000)
    /// - `JWT_SECRET` - Token signing secret (default: development placeholder)
    /// - `TOKEN_TTL_HOURS` - Token lifetime (default: 1)
    /// - `PASSWORD_HASH_COST` - bcrypt cost factor (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_namespace: non_empty_var("CACHE_NAMESPACE").unwrap_or(defaults.cache_namespace),
            redis_url: non_empty_var("REDIS_URL"),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache_timeout_ms: parse_var("CACHE_TIMEOUT_MS").unwrap_or(defaults.cache_timeout_ms),
            store_timeout_ms: parse_var("STORE_TIMEOUT_MS").unwrap_or(defaults.store_timeout_ms),
            jwt_secret: non_empty_var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS").unwrap_or(defaults.token_ttl_hours),
            password_hash_cost: parse_var("PASSWORD_HASH_COST")
                .unwrap_or(defaults.password_hash_cost),
        }
    }

    /// TTL applied to populated cache entries.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Timeout applied to each cache backend call.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    /// Timeout applied to each backing store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// True when the signing secret is still the development placeholder.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: 300,
            cache_namespace: "properties".to_string(),
            redis_url: None,
            max_entries: 10_000,
            cleanup_interval: 30,
            cache_timeout_ms: 250,
            store_timeout_ms: 5_000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: 1,
            password_hash_cost: 10,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache_namespace, "properties");
        assert!(config.redis_url.is_none());
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_TTL");
        env::remove_var("CACHE_NAMESPACE");
        env::remove_var("REDIS_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("PASSWORD_HASH_COST");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.cache_namespace, "properties");
        assert!(config.redis_url.is_none());
        assert_eq!(config.token_ttl_hours, 1);
        assert_eq!(config.password_hash_cost, 10);
    }

    #[test]
    fn test_timeouts_are_milliseconds() {
        let config = Config {
            cache_timeout_ms: 40,
            store_timeout_ms: 900,
            ..Config::default()
        };
        assert_eq!(config.cache_timeout(), Duration::from_millis(40));
        assert_eq!(config.store_timeout(), Duration::from_millis(900));
    }
}
