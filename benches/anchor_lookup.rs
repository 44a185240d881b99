use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use heimdall_anchors::dns::DomainName;
use heimdall_anchors::dnssec::ResourceKey;
use heimdall_anchors::{AnchorConfig, TrustAnchorStore};
use std::fmt::Write as _;
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;

fn build_store(dir: &TempDir, zones: usize) -> TrustAnchorStore {
    let mut positive = String::new();
    let mut negative = String::new();

    for i in 0..zones {
        writeln!(
            positive,
            "zone{}.example IN DS {} 13 2 {:064X}",
            i,
            i % 65536,
            i
        )
        .unwrap();
        writeln!(negative, "internal{}.corp", i).unwrap();
    }

    fs::write(dir.path().join("bench.positive"), positive).unwrap();
    fs::write(dir.path().join("bench.negative"), negative).unwrap();

    let store = TrustAnchorStore::new(AnchorConfig::with_dirs([dir.path()]));
    store.load().unwrap();
    store
}

fn bench_lookup_positive(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_positive");

    for zones in [10, 1000, 10000] {
        let dir = TempDir::new().unwrap();
        let store = build_store(&dir, zones);

        let hit = ResourceKey::ds(DomainName::parse("zone7.example").unwrap());
        let miss = ResourceKey::ds(DomainName::parse("absent.example").unwrap());

        group.bench_with_input(BenchmarkId::new("hit", zones), &hit, |b, key| {
            b.iter(|| black_box(store.lookup_positive(key)));
        });
        group.bench_with_input(BenchmarkId::new("miss", zones), &miss, |b, key| {
            b.iter(|| black_box(store.lookup_positive(key)));
        });
    }

    group.finish();
}

fn bench_lookup_negative(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_negative");

    let dir = TempDir::new().unwrap();
    let store = build_store(&dir, 1000);

    group.bench_function("hit", |b| {
        b.iter(|| black_box(store.lookup_negative("internal500.corp")));
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(store.lookup_negative("www.internal500.corp")));
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store = build_store(&dir, 1000);

    c.bench_function("reload_1000_zones", |b| {
        b.iter(|| store.reload().unwrap());
    });
}

criterion_group!(
    benches,
    bench_lookup_positive,
    bench_lookup_negative,
    bench_load
);
criterion_main!(benches);
