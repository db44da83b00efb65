#![allow(dead_code)]

use ironwall_infrastructure::filterlists::{FilterListStore, SourceMeta};
use sqlx::sqlite::SqlitePoolOptions;

/// In-memory store with the filter-list schema applied. A single
/// connection keeps every query on the same database.
pub async fn create_test_store() -> FilterListStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let store = FilterListStore::new(pool);
    store.init_schema().await.unwrap();
    store
}

pub fn source(id: &str, category: &str, version: &str, entry_count: i64) -> SourceMeta {
    SourceMeta {
        id: id.to_string(),
        category: category.to_string(),
        version: version.to_string(),
        entry_count,
        bloom_capacity: entry_count.max(16),
        bloom_fp_rate: 0.001,
    }
}

pub async fn seed_source(store: &FilterListStore, id: &str, category: &str, entries: &[&str]) {
    let meta = source(id, category, "v1", entries.len() as i64);
    store.upsert_source(&meta).await.unwrap();
    for entry in entries {
        store.insert_entry(id, entry, "v1").await.unwrap();
    }
}
