//! Command line interface.

use crate::config::{CandidateSourceConfig, RuntimeConfig};
use crate::errors::RuntimeError;
use ac_01_rpc_pool::{PoolConfig, DEFAULT_POOL_SIZE, DEFAULT_REQUEST_TIMEOUT_MS};
use ac_04_authchain_resolver::{ResolverConfig, DEFAULT_MAX_HOPS};
use ac_05_batch_orchestrator::{OrchestratorConfig, DEFAULT_CONCURRENCY};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Authchain resolver for BCMR registry announcements
#[derive(Parser, Debug)]
#[command(name = "resolver-runtime")]
#[command(about = "Resolve BCMR authchains against an Electrum backend", version)]
pub struct Cli {
    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve every announcement once and persist the results
    Resolve(ResolveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Electrum websocket endpoint (ws:// or wss://)
    #[arg(long, env = "AC_BACKEND_URL")]
    pub backend_url: String,

    /// JSON file of candidate outputs
    #[arg(long, env = "AC_CANDIDATES", conflicts_with = "chaingraph_url")]
    pub candidates: Option<PathBuf>,

    /// Chaingraph GraphQL endpoint to query for candidates
    #[arg(long, env = "AC_CHAINGRAPH_URL")]
    pub chaingraph_url: Option<String>,

    /// Authchain cache file
    #[arg(long = "cache", env = "AC_CACHE_PATH", default_value = "authchain-cache.json")]
    pub cache_path: PathBuf,

    /// Resolved registry output file
    #[arg(long = "output", env = "AC_OUTPUT_PATH", default_value = "registries.json")]
    pub output_path: PathBuf,

    /// Persistent backend connections
    #[arg(long, env = "AC_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Candidates resolved concurrently
    #[arg(long, env = "AC_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Spend queries allowed per authchain walk
    #[arg(long, env = "AC_MAX_HOPS", default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: u32,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "AC_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl ResolveArgs {
    pub fn into_config(self) -> Result<RuntimeConfig, RuntimeError> {
        let source = match (self.candidates, self.chaingraph_url) {
            (Some(path), None) => CandidateSourceConfig::File(path),
            (None, Some(url)) => CandidateSourceConfig::Chaingraph { url },
            (None, None) => {
                return Err(RuntimeError::Config(
                    "one of --candidates or --chaingraph-url is required".into(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(RuntimeError::Config(
                    "--candidates and --chaingraph-url are mutually exclusive".into(),
                ))
            }
        };

        let pool = PoolConfig {
            pool_size: self.pool_size,
            request_timeout_ms: self.timeout_ms,
            ..PoolConfig::for_url(self.backend_url)
        };

        let config = RuntimeConfig {
            pool,
            resolver: ResolverConfig::with_max_hops(self.max_hops),
            orchestrator: OrchestratorConfig::with_concurrency(self.concurrency),
            source,
            cache_path: self.cache_path,
            output_path: self.output_path,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ResolveArgs {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Command::Resolve(args) => args,
        }
    }

    #[test]
    fn test_parse_with_candidate_file() {
        let args = parse(&[
            "resolver-runtime",
            "resolve",
            "--backend-url",
            "wss://electrum.example:50004",
            "--candidates",
            "candidates.json",
            "--pool-size",
            "8",
            "--max-hops",
            "50",
        ]);
        let config = args.into_config().unwrap();

        assert_eq!(config.pool.url, "wss://electrum.example:50004");
        assert_eq!(config.pool.pool_size, 8);
        assert_eq!(config.resolver.max_hops, 50);
        assert_eq!(config.orchestrator.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.source, CandidateSourceConfig::File("candidates.json".into()));
        assert_eq!(config.cache_path, PathBuf::from("authchain-cache.json"));
    }

    #[test]
    fn test_parse_with_chaingraph() {
        let args = parse(&[
            "resolver-runtime",
            "resolve",
            "--backend-url",
            "ws://localhost:50003",
            "--chaingraph-url",
            "https://chaingraph.example/v1/graphql",
            "--cache",
            "/tmp/c.json",
            "--output",
            "/tmp/o.json",
            "--timeout-ms",
            "2500",
        ]);
        let config = args.into_config().unwrap();

        assert_eq!(config.pool.request_timeout_ms, 2500);
        assert!(matches!(config.source, CandidateSourceConfig::Chaingraph { .. }));
        assert_eq!(config.output_path, PathBuf::from("/tmp/o.json"));
    }

    #[test]
    fn test_source_is_required() {
        let args = parse(&["resolver-runtime", "resolve", "--backend-url", "ws://localhost:1"]);
        assert!(matches!(args.into_config(), Err(RuntimeError::Config(_))));
    }

    #[test]
    fn test_sources_conflict() {
        let result = Cli::try_parse_from([
            "resolver-runtime",
            "resolve",
            "--backend-url",
            "ws://localhost:1",
            "--candidates",
            "a.json",
            "--chaingraph-url",
            "https://x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_backend_url() {
        let args = parse(&[
            "resolver-runtime",
            "resolve",
            "--backend-url",
            "http://localhost:1",
            "--candidates",
            "a.json",
        ]);
        assert!(matches!(args.into_config(), Err(RuntimeError::Backend(_))));
    }
}
