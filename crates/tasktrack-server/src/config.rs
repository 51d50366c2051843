//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::crypto;
use crate::worker::WorkerConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{addr}': {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub http_bind_addr: String,

    /// Minutes a task stays open before it is auto-completed.
    pub auto_complete_minutes: u64,

    /// Seconds between reconciliation sweeps.
    pub scan_interval_secs: u64,

    /// Auto-complete queue capacity.
    pub queue_capacity: usize,

    /// Number of auto-complete consumers.
    pub pool_size: usize,

    /// Bearer token lifetime (hours).
    pub token_expiry_hours: u64,

    /// bcrypt cost for password hashes.
    pub password_cost: u32,

    /// Upper bound on waiting for worker loops at shutdown (seconds).
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_bind_addr: "0.0.0.0:8080".to_string(),
            auto_complete_minutes: 5,
            scan_interval_secs: 60,
            queue_capacity: 100,
            pool_size: 5,
            token_expiry_hours: 24,
            password_cost: crypto::DEFAULT_COST,
            shutdown_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Reject values the worker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "scan interval must be at least one second".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "worker queue capacity must be positive".to_string(),
            ));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid(
                "worker pool size must be positive".to_string(),
            ));
        }
        if !(crypto::MIN_COST..=crypto::MAX_COST).contains(&self.password_cost) {
            return Err(ConfigError::Invalid(format!(
                "password cost must be between {} and {}",
                crypto::MIN_COST,
                crypto::MAX_COST
            )));
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.http_bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                addr: self.http_bind_addr.clone(),
                source,
            })
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.auto_complete_minutes * 60)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Auto-completion worker settings.
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            grace_period: self.grace_period(),
            scan_interval: Duration::from_secs(self.scan_interval_secs),
            queue_capacity: self.queue_capacity,
            pool_size: self.pool_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_worker_defaults() {
        let config = Config::default();
        config.validate().unwrap();

        let worker = config.worker_config();
        let defaults = WorkerConfig::default();
        assert_eq!(worker.grace_period, defaults.grace_period);
        assert_eq!(worker.scan_interval, defaults.scan_interval);
        assert_eq!(worker.queue_capacity, defaults.queue_capacity);
        assert_eq!(worker.pool_size, defaults.pool_size);
    }

    #[test]
    fn test_grace_period_in_minutes() {
        let config = Config {
            auto_complete_minutes: 2,
            ..Config::default()
        };
        assert_eq!(config.grace_period(), Duration::from_secs(120));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let bad_addr = Config {
            http_bind_addr: "nowhere".to_string(),
            ..Config::default()
        };
        assert!(matches!(bad_addr.validate(), Err(ConfigError::InvalidAddr { .. })));

        let no_pool = Config {
            pool_size: 0,
            ..Config::default()
        };
        assert!(matches!(no_pool.validate(), Err(ConfigError::Invalid(_))));

        let no_interval = Config {
            scan_interval_secs: 0,
            ..Config::default()
        };
        assert!(no_interval.validate().is_err());

        let weak_cost = Config {
            password_cost: 3,
            ..Config::default()
        };
        assert!(matches!(weak_cost.validate(), Err(ConfigError::Invalid(_))));
    }
}
