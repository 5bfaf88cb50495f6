//! # End-to-End Resolution
//!
//! Candidate source → BCMR parser → orchestrator → resolver → spend query
//! → connection pool → mock Electrum server, with the cache persisted to a
//! real file between runs.

#[cfg(test)]
mod tests {
    use crate::mock_electrum::{bcmr_announcement, MockElectrumServer};
    use ac_01_rpc_pool::PoolConfig;
    use ac_03_authchain_cache::{CacheStore, FileCacheStore, InMemoryCacheStore};
    use resolver_runtime::adapters::StaticSource;
    use resolver_runtime::{CandidateSourceConfig, ResolverRuntime, RunSummary, RuntimeConfig};
    use shared_types::{CandidateOutput, ResolvedRegistry, TxId};
    use std::path::Path;
    use tempfile::TempDir;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn tx(byte: u8) -> TxId {
        TxId([byte; 32])
    }

    fn chain_tx(registry: u8, position: u8) -> TxId {
        let mut hash = [0u8; 32];
        hash[0] = registry;
        hash[1] = position;
        TxId(hash)
    }

    fn candidate(authbase: TxId, uri: &str) -> CandidateOutput {
        CandidateOutput {
            txid: authbase,
            output_index: 1,
            locking_script: bcmr_announcement([0x11; 32], uri),
            block_height: Some(800_000),
            is_first_output_in_tx: false,
        }
    }

    struct Harness {
        server: MockElectrumServer,
        dir: TempDir,
        runtime: ResolverRuntime,
    }

    impl Harness {
        async fn new() -> Self {
            let server = MockElectrumServer::start().await.unwrap();
            let dir = tempfile::tempdir().unwrap();

            let mut config = RuntimeConfig::new(
                PoolConfig::for_testing(server.url()),
                CandidateSourceConfig::File(dir.path().join("candidates.json")),
            );
            config.cache_path = dir.path().join("authchain-cache.json");
            config.output_path = dir.path().join("registries.json");

            let runtime = ResolverRuntime::new(config).unwrap();
            Self {
                server,
                dir,
                runtime,
            }
        }

        fn cache_path(&self) -> &Path {
            &self.runtime.config().cache_path
        }

        fn store(&self) -> FileCacheStore {
            FileCacheStore::new(self.cache_path())
        }

        async fn run(&self, candidates: Vec<CandidateOutput>) -> RunSummary {
            let source = StaticSource::new(candidates);
            self.runtime.run_with(&source, &self.store()).await.unwrap()
        }

        fn written_registries(&self) -> Vec<ResolvedRegistry> {
            let text = std::fs::read_to_string(self.dir.path().join("registries.json")).unwrap();
            serde_json::from_str(&text).unwrap()
        }
    }

    // =============================================================================
    // RUNS
    // =============================================================================

    #[tokio::test]
    async fn test_cold_warm_and_extended_runs() {
        let harness = Harness::new().await;
        harness
            .server
            .add_chain(&[tx(0xaa), tx(0xbb)], &bcmr_announcement([0x11; 32], "a.example"));
        let candidates = vec![candidate(tx(0xaa), "a.example")];

        // Cold: two spend checks, five RPCs
        let cold = harness.run(candidates.clone()).await;
        assert_eq!(cold.stats.miss, 1);
        assert_eq!(cold.stats.queries, 2);
        assert_eq!(harness.server.total_requests(), 5);
        let registry = &cold.registries[0];
        assert_eq!(registry.authhead, tx(0xbb));
        assert_eq!(registry.authchain_length, 2);
        assert!(registry.is_authhead_unspent);
        assert!(registry.is_valid);

        let saved = harness.store().load();
        assert_eq!(saved.get(&tx(0xaa)).map(|e| e.authhead), Some(tx(0xbb)));

        // Warm: one probe of the cached authhead
        let warm = harness.run(candidates.clone()).await;
        assert_eq!(warm.stats.good, 1);
        assert_eq!(warm.stats.queries, 1);
        assert_eq!(harness.server.total_requests(), 7);
        assert_eq!(warm.registries, cold.registries);

        // Chain grows: resume from the cached authhead
        harness.server.extend_chain(tx(0xbb), tx(0xcc));
        let extended = harness.run(candidates).await;
        assert_eq!(extended.stats.partial, 1);
        assert_eq!(extended.stats.queries, 2);
        assert_eq!(extended.registries[0].authhead, tx(0xcc));
        assert_eq!(extended.registries[0].authchain_length, 3);
        assert_eq!(harness.written_registries(), extended.registries);
    }

    #[tokio::test]
    async fn test_backend_fault_keeps_previous_cache_entry() {
        let harness = Harness::new().await;
        harness
            .server
            .add_chain(&[tx(0xaa), tx(0xbb)], &bcmr_announcement([0x11; 32], "a.example"));
        let candidates = vec![candidate(tx(0xaa), "a.example")];
        harness.run(candidates.clone()).await;
        let before = harness.store().load().get(&tx(0xaa)).cloned().unwrap();

        harness.server.extend_chain(tx(0xbb), tx(0xcc));
        harness.server.fail_transaction(tx(0xcc));

        let faulted = harness.run(candidates.clone()).await;
        assert_eq!(faulted.stats.unconfirmed, 1);
        assert!(!faulted.registries[0].is_authhead_unspent);
        assert_eq!(harness.store().load().get(&tx(0xaa)), Some(&before));

        harness.server.heal_transaction(tx(0xcc));
        let healed = harness.run(candidates).await;
        assert_eq!(healed.stats.unconfirmed, 0);
        assert_eq!(healed.registries[0].authhead, tx(0xcc));
        assert!(healed.registries[0].is_authhead_unspent);
    }

    #[tokio::test]
    async fn test_non_bcmr_outputs_are_skipped() {
        let harness = Harness::new().await;
        harness
            .server
            .add_chain(&[tx(0x01)], &bcmr_announcement([0x22; 32], "b.example"));

        let mut p2pkh = candidate(tx(0x02), "ignored");
        p2pkh.locking_script = vec![0x76, 0xa9, 0x14];

        let summary = harness.run(vec![candidate(tx(0x01), "b.example"), p2pkh]).await;
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.registries.len(), 1);
        assert_eq!(summary.cache_entries, 1);
    }

    #[tokio::test]
    async fn test_incompatible_cache_file_resolves_cold() {
        let harness = Harness::new().await;
        harness
            .server
            .add_chain(&[tx(0xaa)], &bcmr_announcement([0x11; 32], "a.example"));
        let authbase = tx(0xaa).to_hex();
        std::fs::write(
            harness.cache_path(),
            format!(
                r#"{{"version":2,"entries":{{"{authbase}":{{"authbase":"{authbase}","authhead":"{authbase}","chainLength":1,"isActive":false,"lastCheckedTimestamp":0}}}}}}"#
            ),
        )
        .unwrap();

        let summary = harness.run(vec![candidate(tx(0xaa), "a.example")]).await;
        assert_eq!(summary.stats.miss, 1);
        assert!(summary.registries[0].is_authhead_unspent);

        let text = std::fs::read_to_string(harness.cache_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
    }

    #[tokio::test]
    async fn test_multiple_registries_share_the_pool() {
        let harness = Harness::new().await;
        let mut candidates = Vec::new();
        for n in 1..=20u8 {
            let chain: Vec<TxId> = (0..(n % 4 + 1)).map(|i| chain_tx(n, i)).collect();
            harness.server.add_chain(&chain, &bcmr_announcement([n; 32], "c.example"));
            candidates.push(candidate(chain[0], "c.example"));
        }

        let summary = harness.run(candidates).await;
        assert_eq!(summary.registries.len(), 20);
        assert_eq!(summary.stats.active, 20);
        for registry in &summary.registries {
            let n = registry.authbase.as_bytes()[0];
            assert_eq!(registry.authchain_length, u32::from(n % 4 + 1));
        }
        assert!(harness.server.counts().connections.load(std::sync::atomic::Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_in_memory_store_skips_the_cache_file() {
        let harness = Harness::new().await;
        harness
            .server
            .add_chain(&[tx(0x0a), tx(0x0b), tx(0x0c)], &bcmr_announcement([0x33; 32], "d.example"));
        let store = InMemoryCacheStore::new();
        let source = StaticSource::new(vec![candidate(tx(0x0a), "d.example")]);

        let cold = harness.runtime.run_with(&source, &store).await.unwrap();
        let warm = harness.runtime.run_with(&source, &store).await.unwrap();

        assert_eq!(cold.stats.miss, 1);
        assert_eq!(cold.stats.queries, 3);
        assert_eq!(warm.stats.good, 1);
        assert!(store.has_snapshot());
        assert!(!harness.cache_path().exists());
    }
}
