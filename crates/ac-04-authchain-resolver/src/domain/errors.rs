//! # Resolver Errors
//!
//! Resolution itself never fails; only configuration can be rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// Invalid configuration
    #[error("invalid resolver configuration: {0}")]
    InvalidConfig(String),
}
