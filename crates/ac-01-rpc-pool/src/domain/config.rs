//! Pool configuration with validation.

use super::error::PoolError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of persistent connections.
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Default per-call timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Upper bound on connections to a single backend.
pub const MAX_POOL_SIZE: usize = 64;

/// Connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Backend websocket URL (`ws://` or `wss://`).
    pub url: String,
    /// Number of connections kept open.
    pub pool_size: usize,
    /// Timeout applied to every logical call, queueing included.
    pub request_timeout_ms: u64,
    /// Timeout for a single websocket handshake.
    pub connect_timeout_ms: u64,
    /// First reconnection delay; doubles per failed attempt.
    pub reconnect_base_delay_ms: u64,
    /// Ceiling for the reconnection delay.
    pub max_reconnect_delay_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: "wss://electrum.imaginary.cash:50004".to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connect_timeout_ms: 10_000,
            reconnect_base_delay_ms: 500,
            max_reconnect_delay_ms: 30_000,
        }
    }
}

impl PoolConfig {
    /// Config pointing at `url` with every other value defaulted.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Short timeouts and delays for tests against a local server.
    pub fn for_testing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: 2,
            request_timeout_ms: 2_000,
            connect_timeout_ms: 1_000,
            reconnect_base_delay_ms: 20,
            max_reconnect_delay_ms: 200,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), PoolError> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(PoolError::Config(format!(
                "backend url must use ws:// or wss://, got '{}'",
                self.url
            )));
        }

        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(PoolError::Config(format!(
                "pool_size must be within 1..={}, got {}",
                MAX_POOL_SIZE, self.pool_size
            )));
        }

        if self.request_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err(PoolError::Config("timeouts cannot be 0".into()));
        }

        if self.reconnect_base_delay_ms > self.max_reconnect_delay_ms {
            return Err(PoolError::Config(
                "reconnect_base_delay_ms exceeds max_reconnect_delay_ms".into(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Exponential backoff: base * 2^attempts, capped.
    pub fn reconnect_delay(&self, attempts: u32) -> Duration {
        let millis = self
            .reconnect_base_delay_ms
            .saturating_mul(1 << attempts.min(6));
        Duration::from_millis(millis.min(self.max_reconnect_delay_ms))
    }
}
