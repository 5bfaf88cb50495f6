//! # Adapters
//!
//! - `file`: JSON file with atomic replace
//! - `memory`: in-process store for tests

pub mod file;
pub mod memory;

pub use file::FileCacheStore;
pub use memory::InMemoryCacheStore;
