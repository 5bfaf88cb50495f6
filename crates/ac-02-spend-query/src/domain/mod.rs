//! # Domain Module
//!
//! Spend status, typed backend responses and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
