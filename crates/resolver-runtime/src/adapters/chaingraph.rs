//! Chaingraph candidate source.
//!
//! Asks a Chaingraph GraphQL endpoint for every output whose locking
//! bytecode starts with the BCMR prefix. Chaingraph renders `bytea` columns
//! as `\x`-prefixed hex and may render bigints as strings.

use super::bcmr_script::BCMR_PREFIX_HEX;
use super::candidates::{CandidateSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shared_types::{CandidateOutput, TxId};
use std::time::Duration;
use tracing::{debug, info};

const SEARCH_QUERY: &str = r#"
query SearchBcmrOutputs($prefix: String!) {
  search_output_prefix(args: { locking_bytecode_prefix_hex: $prefix }) {
    transaction_hash
    output_index
    locking_bytecode
    transaction {
      block_inclusions {
        block {
          height
        }
      }
    }
  }
}
"#;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct SearchData {
    search_output_prefix: Vec<ChaingraphOutput>,
}

#[derive(Deserialize)]
struct ChaingraphOutput {
    transaction_hash: String,
    #[serde(deserialize_with = "number_or_string")]
    output_index: u64,
    locking_bytecode: String,
    transaction: ChaingraphTransaction,
}

#[derive(Deserialize)]
struct ChaingraphTransaction {
    #[serde(default)]
    block_inclusions: Vec<BlockInclusion>,
}

#[derive(Deserialize)]
struct BlockInclusion {
    block: ChaingraphBlock,
}

#[derive(Deserialize)]
struct ChaingraphBlock {
    #[serde(deserialize_with = "number_or_string")]
    height: u64,
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("not a u64: {n}"))),
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!("expected number, got {other}"))),
    }
}

fn decode_bytea(value: &str) -> Result<Vec<u8>, SourceError> {
    let hex_part = value.strip_prefix("\\x").unwrap_or(value);
    hex::decode(hex_part).map_err(|e| SourceError::Parse(format!("bad bytea '{value}': {e}")))
}

impl ChaingraphOutput {
    fn into_candidate(self) -> Result<CandidateOutput, SourceError> {
        let hash: [u8; 32] = decode_bytea(&self.transaction_hash)?
            .try_into()
            .map_err(|_| SourceError::Parse(format!("bad transaction hash {}", self.transaction_hash)))?;
        let output_index = u32::try_from(self.output_index)
            .map_err(|_| SourceError::Parse(format!("output index {} out of range", self.output_index)))?;

        // Earliest inclusion wins when a transaction appears in competing blocks
        let block_height = self
            .transaction
            .block_inclusions
            .iter()
            .map(|inclusion| inclusion.block.height)
            .min();

        Ok(CandidateOutput {
            txid: TxId(hash),
            output_index,
            locking_script: decode_bytea(&self.locking_bytecode)?,
            block_height,
            is_first_output_in_tx: output_index == 0,
        })
    }
}

/// Decode a raw GraphQL response body into candidates.
pub fn parse_search_response(body: &str) -> Result<Vec<CandidateOutput>, SourceError> {
    let response: GraphQlResponse<SearchData> =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(SourceError::GraphQl(messages.join("; ")));
    }
    let data = response
        .data
        .ok_or_else(|| SourceError::GraphQl("response carried no data".into()))?;

    data.search_output_prefix
        .into_iter()
        .map(ChaingraphOutput::into_candidate)
        .collect()
}

/// Candidate source backed by a Chaingraph instance.
pub struct ChaingraphSource {
    client: Client,
    url: String,
}

impl ChaingraphSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CandidateSource for ChaingraphSource {
    fn describe(&self) -> String {
        format!("chaingraph {}", self.url)
    }

    async fn fetch_candidates(&self) -> Result<Vec<CandidateOutput>, SourceError> {
        let request = GraphQlRequest {
            query: SEARCH_QUERY,
            variables: serde_json::json!({ "prefix": BCMR_PREFIX_HEX }),
        };

        debug!(url = %self.url, "Querying Chaingraph for BCMR outputs");
        let body = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let candidates = parse_search_response(&body)?;
        info!(url = %self.url, count = candidates.len(), "Fetched candidates from Chaingraph");
        Ok(candidates)
    }
}
