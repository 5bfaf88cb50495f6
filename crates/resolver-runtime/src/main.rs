//! # Authchain Resolver
//!
//! Resolves the authchain of every BCMR announcement once, then saves the
//! cache and the registry list.
//!
//! ```bash
//! resolver-runtime resolve \
//!     --backend-url wss://electrum.imaginary.cash:50004 \
//!     --candidates candidates.json
//! ```

use ac_telemetry::{init_logging, TelemetryConfig};
use anyhow::{Context, Result};
use clap::Parser;
use resolver_runtime::cli::{Cli, Command};
use resolver_runtime::{ResolverRuntime, VERSION};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_level(level.clone());
    }
    init_logging(&telemetry).context("failed to initialize logging")?;

    info!(version = VERSION, "Authchain resolver starting");

    let result = match cli.command {
        Command::Resolve(args) => resolve(args).await,
    };
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "Run failed");
    }
    result
}

async fn resolve(args: resolver_runtime::cli::ResolveArgs) -> Result<()> {
    let config = args.into_config().context("invalid configuration")?;
    let runtime = ResolverRuntime::new(config)?;

    let summary = runtime.run().await.context("resolution run failed")?;

    info!(
        candidates = summary.candidates,
        skipped = summary.skipped,
        registries = summary.registries.len(),
        cache_entries = summary.cache_entries,
        hit_rate = %format!("{:.1}%", summary.stats.hit_rate() * 100.0),
        queries = summary.stats.queries,
        "Run complete"
    );
    Ok(())
}
