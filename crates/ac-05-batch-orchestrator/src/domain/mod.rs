//! # Domain Module

pub mod config;
pub mod entities;

pub use config::*;
pub use entities::*;
