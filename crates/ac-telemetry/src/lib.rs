//! # Authchain Telemetry
//!
//! Structured logging for every authchain subsystem.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ac_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `AC_JSON_LOGS` | `false` | Emit JSON lines instead of text |
//! | `AC_LOG_TARGETS` | `true` | Include the module target in each line |

#![warn(clippy::all)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install global subscriber: {0}")]
    SubscriberInit(String),
}
