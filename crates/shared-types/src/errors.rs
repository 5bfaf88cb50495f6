//! # Error Types
//!
//! Errors raised while parsing shared domain values.

use thiserror::Error;

/// Errors produced when decoding identifiers from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Transaction id was not 64 hex characters.
    #[error("Invalid txid length: expected 64 hex chars, got {0}")]
    InvalidTxIdLength(usize),

    /// Input contained non-hex characters.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for TypeError {
    fn from(e: hex::FromHexError) -> Self {
        TypeError::InvalidHex(e.to_string())
    }
}
