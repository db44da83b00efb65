use ironwall_domain::DomainError;
use sqlx::{Row, SqlitePool};

/// Metadata of one blocklist source, persisted alongside its entries so a
/// reader can rebuild the identical bloom filter.
#[derive(Debug, Clone)]
pub struct SourceMeta {
    pub id: String,
    pub category: String,
    pub version: String,
    pub entry_count: i64,
    pub bloom_capacity: i64,
    pub bloom_fp_rate: f64,
}

/// Content-addressed store of filter-list entries, keyed by source and
/// entity key. The update/distribution subsystem writes it; the decision
/// core only reads.
#[derive(Clone)]
pub struct FilterListStore {
    pool: SqlitePool,
}

impl FilterListStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS filterlist_sources (
                id             TEXT PRIMARY KEY,
                category       TEXT NOT NULL,
                version        TEXT NOT NULL,
                entry_count    INTEGER NOT NULL DEFAULT 0,
                bloom_capacity INTEGER NOT NULL DEFAULT 1000,
                bloom_fp_rate  REAL NOT NULL DEFAULT 0.001
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS filterlist_entries (
                source_id  TEXT NOT NULL,
                entry_key  TEXT NOT NULL,
                version    TEXT NOT NULL,
                PRIMARY KEY (source_id, entry_key)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    pub async fn load_sources(&self) -> Result<Vec<SourceMeta>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, category, version, entry_count, bloom_capacity, bloom_fp_rate
             FROM filterlist_sources ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| SourceMeta {
                id: row.get("id"),
                category: row.get("category"),
                version: row.get("version"),
                entry_count: row.get("entry_count"),
                bloom_capacity: row.get("bloom_capacity"),
                bloom_fp_rate: row.get("bloom_fp_rate"),
            })
            .collect())
    }

    pub async fn entry_keys(&self, source_id: &str) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query("SELECT entry_key FROM filterlist_entries WHERE source_id = ?")
            .bind(source_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows.iter().map(|row| row.get("entry_key")).collect())
    }

    pub async fn contains(&self, source_id: &str, entry_key: &str) -> Result<bool, DomainError> {
        let row =
            sqlx::query("SELECT 1 FROM filterlist_entries WHERE source_id = ? AND entry_key = ?")
                .bind(source_id)
                .bind(entry_key)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.is_some())
    }

    /// Rows left behind by an incomplete update: their version no longer
    /// matches their source's manifest version.
    pub async fn stale_entry_count(&self) -> Result<i64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS stale FROM filterlist_entries e
             LEFT JOIN filterlist_sources s ON s.id = e.source_id
             WHERE s.id IS NULL OR s.version != e.version",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.get("stale"))
    }

    pub async fn upsert_source(&self, meta: &SourceMeta) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO filterlist_sources
                (id, category, version, entry_count, bloom_capacity, bloom_fp_rate)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                version = excluded.version,
                entry_count = excluded.entry_count,
                bloom_capacity = excluded.bloom_capacity,
                bloom_fp_rate = excluded.bloom_fp_rate",
        )
        .bind(&meta.id)
        .bind(&meta.category)
        .bind(&meta.version)
        .bind(meta.entry_count)
        .bind(meta.bloom_capacity)
        .bind(meta.bloom_fp_rate)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    pub async fn insert_entry(
        &self,
        source_id: &str,
        entry_key: &str,
        version: &str,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO filterlist_entries (source_id, entry_key, version)
             VALUES (?, ?, ?)
             ON CONFLICT(source_id, entry_key) DO UPDATE SET version = excluded.version",
        )
        .bind(source_id)
        .bind(entry_key)
        .bind(version)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}
