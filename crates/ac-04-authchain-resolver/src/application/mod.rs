//! # Application Layer

pub mod resolver;

pub use resolver::AuthchainResolver;
