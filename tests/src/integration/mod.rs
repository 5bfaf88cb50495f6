//! # Integration Tests
//!
//! Runs the resolver runtime against the mock Electrum server.

pub mod e2e_resolution;
