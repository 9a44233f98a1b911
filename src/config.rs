//! Environment Configuration
//!
//! A single connection-string setting identifies the relational store. Its
//! absence is a startup-time fatal condition, not a per-request error.

use std::time::Duration;

use anyhow::{Context, Result};

/// Configuration for the analytics service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string (`DATABASE_URL`). Required.
    pub database_url: String,
    /// Listen address for the HTTP server.
    pub bind_addr: String,
    /// Upper bound on live pool connections.
    pub pool_max: u32,
    /// How long a request may wait for a free connection.
    pub acquire_timeout: Duration,
    /// How long an idle connection is kept before being closed.
    pub idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL is not set; refusing to start without a store")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            bind_addr,
            pool_max: env_u32("DB_POOL_MAX", 10),
            acquire_timeout: Duration::from_secs(env_u64("DB_ACQUIRE_TIMEOUT_SECS", 10)),
            idle_timeout: Duration::from_secs(env_u64("DB_IDLE_TIMEOUT_SECS", 30)),
        })
    }
}

// Malformed or out-of-range knob values fall back to the default; only the
// connection string itself is load-bearing enough to refuse startup.
fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_u64_default_when_unset() {
        assert_eq!(env_u64("SABERPRO_TEST_UNSET_KNOB", 10), 10);
    }

    #[test]
    fn test_env_u32_rejects_out_of_range_without_wrapping() {
        // 2^32 would wrap to 0 under a lossy cast; it must take the default.
        std::env::set_var("SABERPRO_TEST_POOL_OVERFLOW", "4294967296");
        assert_eq!(env_u32("SABERPRO_TEST_POOL_OVERFLOW", 10), 10);

        std::env::set_var("SABERPRO_TEST_POOL_VALID", "32");
        assert_eq!(env_u32("SABERPRO_TEST_POOL_VALID", 10), 32);

        std::env::set_var("SABERPRO_TEST_POOL_GARBAGE", "many");
        assert_eq!(env_u32("SABERPRO_TEST_POOL_GARBAGE", 10), 10);
    }
}
