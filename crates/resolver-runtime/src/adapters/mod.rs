//! # Adapters
//!
//! Script parsing, candidate sources and file output.

pub mod bcmr_script;
pub mod candidates;
pub mod chaingraph;
pub mod output;

pub use bcmr_script::{parse_bcmr, parse_pushes, ScriptError, BCMR_PREFIX_HEX};
pub use candidates::{CandidateSource, JsonFileSource, SourceError, StaticSource};
pub use chaingraph::ChaingraphSource;
pub use output::write_registries;
