//! Benchmarks for item queries.
//!
//! Measures `find_items` on both engines with:
//! - no predicate (full scan with status and note resolution)
//! - a status-kind predicate (index or join)

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use statusboard::filters::{QuerySpec, query};
use statusboard::models::{Item, Note, StatusKind};
use statusboard::storage::{BoardStore, MemDbStore, OpContext, SqliteStore, default_statuses};

// ============================================================================
// Helper Functions
// ============================================================================

/// Fills a store with the default statuses and `count` items spread across
/// them, each with one note.
fn populate(store: &dyn BoardStore, count: usize) {
    let ctx = OpContext::background();
    let statuses: Vec<_> = default_statuses(chrono::Utc::now())
        .into_iter()
        .map(|s| store.store_status(&ctx, s).unwrap())
        .collect();
    for i in 0..count {
        let status = &statuses[i % statuses.len()];
        let mut item = Item::new(format!("item-{i:05}")).with_status_id(status.id.clone());
        item.notes.push(Note::new(format!("note for item {i}")));
        store.store_item(&ctx, item).unwrap();
    }
}

fn engines(count: usize) -> Vec<(&'static str, Box<dyn BoardStore>)> {
    let memdb: Box<dyn BoardStore> = Box::new(MemDbStore::new().unwrap());
    let sqlite: Box<dyn BoardStore> = Box::new(SqliteStore::in_memory().unwrap());
    populate(memdb.as_ref(), count);
    populate(sqlite.as_ref(), count);
    vec![("memdb", memdb), ("sqlite", sqlite)]
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_find_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_items_all");
    group.measurement_time(Duration::from_secs(5));
    let ctx = OpContext::background();
    let q = QuerySpec::all();

    for count in [100, 1_000] {
        for (name, store) in engines(count) {
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, _| {
                b.iter(|| black_box(store.find_items(&ctx, &q).unwrap()));
            });
        }
    }
    group.finish();
}

fn bench_find_by_kind(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_items_by_kind");
    group.measurement_time(Duration::from_secs(5));
    let ctx = OpContext::background();
    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Down, StatusKind::Warning])]).unwrap();

    for count in [100, 1_000] {
        for (name, store) in engines(count) {
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, _| {
                b.iter(|| black_box(store.find_items(&ctx, &q).unwrap()));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_find_all, bench_find_by_kind);
criterion_main!(benches);
