//! # Application Layer

pub mod orchestrator;

pub use orchestrator::BatchOrchestrator;
