//! # Authchain Resolution Benchmarks
//!
//! | Case | Spend checks |
//! |------|--------------|
//! | Cold walk of an n-link chain | n |
//! | Cached active authhead (probe) | 1 |
//! | Cached inactive chain | 0 |
//! | BCMR script parse | 0 |
//! | Orchestrated warm run over 500 registries | 1 per registry |

use ac_03_authchain_cache::{AuthchainCache, AuthchainCacheEntry};
use ac_04_authchain_resolver::{AuthchainResolver, MockSpendChecker, ResolverConfig};
use ac_05_batch_orchestrator::{Announcement, BatchOrchestrator, OrchestratorConfig};
use ac_tests::mock_electrum::bcmr_announcement;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use resolver_runtime::adapters::parse_bcmr;
use shared_types::{CandidateOutput, RegistryMetadata, TxId};
use tokio::runtime::Runtime;

fn chain_tx(position: u32) -> TxId {
    let mut hash = [0u8; 32];
    hash[..4].copy_from_slice(&position.to_be_bytes());
    TxId(hash)
}

fn resolver_with_chain(length: u32) -> AuthchainResolver<MockSpendChecker> {
    let checker = MockSpendChecker::new();
    let chain: Vec<TxId> = (0..length).map(chain_tx).collect();
    checker.chain(&chain);
    AuthchainResolver::new(checker, ResolverConfig::default()).unwrap()
}

fn bench_cold_walk(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("ac-04-cold-walk");

    for length in [1u32, 10, 100, 1000] {
        let resolver = resolver_with_chain(length);
        group.throughput(Throughput::Elements(u64::from(length)));
        group.bench_with_input(BenchmarkId::from_parameter(length), &resolver, |b, resolver| {
            b.iter(|| rt.block_on(resolver.resolve(black_box(chain_tx(0)), None)))
        });
    }

    group.finish();
}

fn bench_cached(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("ac-04-cached");

    let resolver = resolver_with_chain(100);
    let active = AuthchainCacheEntry::new(chain_tx(0), chain_tx(99), 100, true);
    let inactive = AuthchainCacheEntry::new(chain_tx(0), chain_tx(99), 100, false);

    group.bench_function("probe_active", |b| {
        b.iter(|| rt.block_on(resolver.resolve(chain_tx(0), Some(black_box(&active)))))
    });
    group.bench_function("inactive_hit", |b| {
        b.iter(|| rt.block_on(resolver.resolve(chain_tx(0), Some(black_box(&inactive)))))
    });

    group.finish();
}

fn bench_bcmr_parse(c: &mut Criterion) {
    let script = bcmr_announcement([0x5a; 32], "https://example.com/.well-known/bitcoin-cash-metadata-registry.json");
    c.bench_function("bcmr_parse", |b| b.iter(|| parse_bcmr(black_box(&script))));
}

fn bench_orchestrated_run(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("ac-05-run");

    let checker = MockSpendChecker::new();
    let announcements: Vec<Announcement> = (0..500u32)
        .map(|n| {
            let authbase = chain_tx(n * 4);
            let links: Vec<TxId> = (0..4).map(|i| chain_tx(n * 4 + i)).collect();
            checker.chain(&links);
            Announcement::new(
                CandidateOutput {
                    txid: authbase,
                    output_index: 1,
                    locking_script: bcmr_announcement([0x5a; 32], "a.example"),
                    block_height: Some(800_000),
                    is_first_output_in_tx: false,
                },
                RegistryMetadata {
                    hash: [0x5a; 32],
                    uris: vec!["a.example".into()],
                },
            )
        })
        .collect();
    let orchestrator = BatchOrchestrator::new(
        AuthchainResolver::new(checker, ResolverConfig::default()).unwrap(),
        OrchestratorConfig::default(),
    );
    let warm = rt.block_on(orchestrator.run(&announcements, &AuthchainCache::new())).cache;

    group.throughput(Throughput::Elements(announcements.len() as u64));
    group.bench_function("cold", |b| {
        b.iter(|| rt.block_on(orchestrator.run(black_box(&announcements), &AuthchainCache::new())))
    });
    group.bench_function("warm", |b| {
        b.iter(|| rt.block_on(orchestrator.run(black_box(&announcements), &warm)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cold_walk,
    bench_cached,
    bench_bcmr_parse,
    bench_orchestrated_run
);
criterion_main!(benches);
