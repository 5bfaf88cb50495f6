//! Candidate sources: where announcement outputs come from.

use async_trait::async_trait;
use shared_types::CandidateOutput;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read candidates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse candidates: {0}")]
    Parse(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

/// Supplies the candidate announcement outputs for one run.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short label for logs.
    fn describe(&self) -> String;

    async fn fetch_candidates(&self) -> Result<Vec<CandidateOutput>, SourceError>;
}

/// JSON array of candidates on disk, in the same camelCase shape the
/// candidates serialize to.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CandidateSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch_candidates(&self) -> Result<Vec<CandidateOutput>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let candidates: Vec<CandidateOutput> =
            serde_json::from_str(&text).map_err(|e| SourceError::Parse(e.to_string()))?;
        info!(path = %self.path.display(), count = candidates.len(), "Loaded candidates");
        Ok(candidates)
    }
}

/// Fixed candidate list for testing.
pub struct StaticSource {
    candidates: Vec<CandidateOutput>,
}

impl StaticSource {
    pub fn new(candidates: Vec<CandidateOutput>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} static candidates", self.candidates.len())
    }

    async fn fetch_candidates(&self) -> Result<Vec<CandidateOutput>, SourceError> {
        Ok(self.candidates.clone())
    }
}
