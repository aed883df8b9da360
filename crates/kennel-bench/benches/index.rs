//! Breed index benchmarks for KennelDB.
//!
//! Benchmarks for:
//! - Inserts with distinct and repeated keys
//! - Traced searches (hit and miss)
//! - Root-only vs recursive splitting

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kennel_bench::utils::{generate_breeds, generate_entries};
use kennel_common::RowId;
use kennel_index::{BPlusTree, IndexConfig, SplitPolicy};

fn tree_with(policy: SplitPolicy) -> BPlusTree {
    let config = IndexConfig::new().with_split_policy(policy);
    BPlusTree::with_config(config).expect("valid config")
}

/// Benchmark inserting distinct breeds under both split policies.
fn bench_insert_distinct(c: &mut Criterion) {
    let mut group = c.benchmark_group("index/insert_distinct");

    for policy in [SplitPolicy::RootOnly, SplitPolicy::Recursive] {
        for size in [100, 1_000, 5_000] {
            let breeds = generate_breeds(size);

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(
                BenchmarkId::new(policy.to_string(), size),
                &breeds,
                |b, breeds| {
                    b.iter(|| {
                        let mut tree = tree_with(policy);
                        for (i, breed) in breeds.iter().enumerate() {
                            tree.insert(breed.as_str(), RowId::new(i as u64 + 1));
                        }
                        black_box(tree.len())
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark inserting repeated breeds (mostly appends to existing keys).
fn bench_insert_repeated(c: &mut Criterion) {
    let mut group = c.benchmark_group("index/insert_repeated");

    for size in [1_000, 10_000] {
        let entries = generate_entries(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                let mut tree = BPlusTree::new();
                for (breed, id) in entries {
                    tree.insert(breed.as_str(), *id);
                }
                black_box(tree.len())
            });
        });
    }

    group.finish();
}

/// Benchmark traced searches for present and missing breeds.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("index/search");

    for policy in [SplitPolicy::RootOnly, SplitPolicy::Recursive] {
        let breeds = generate_breeds(1_000);
        let mut tree = tree_with(policy);
        for (i, breed) in breeds.iter().enumerate() {
            tree.insert(breed.as_str(), RowId::new(i as u64 + 1));
        }
        let hit = breeds[breeds.len() / 2].clone();

        group.bench_function(BenchmarkId::new("hit", policy), |b| {
            b.iter(|| black_box(tree.search(black_box(&hit))))
        });
        group.bench_function(BenchmarkId::new("miss", policy), |b| {
            b.iter(|| black_box(tree.search(black_box("Xoloitzcuintli"))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_distinct,
    bench_insert_repeated,
    bench_search
);
criterion_main!(benches);
