//! Structured backend: one SQLite table per collection.
//!
//! Records are stored as JSON in the `data` column, with the identifier in an
//! `AUTOINCREMENT` primary key (never reused) and each indexed field copied
//! into its own column. The unique index on `requests.ticket_number` rejects
//! duplicate ticket numbers.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sqlx::SqlitePool;
use tokio::sync::OnceCell;

use super::init_db;
use crate::error::StoreError;
use crate::local::RecordStore;
use crate::models::{fields, now_timestamp, Collection, Record};

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    data: String,
}

impl RecordRow {
    fn into_record(self) -> Result<Record, StoreError> {
        let map: Map<String, Value> = serde_json::from_str(&self.data)?;
        let mut record = Record::from(map);
        record.set_id(self.id);
        Ok(record)
    }
}

/// Lazily opened SQLite store.
///
/// The connection pool is created on first use and reused for the life of
/// the value. A failed open is not cached, so the next call tries again.
#[derive(Debug)]
pub struct StructuredStore {
    path: PathBuf,
    pool: OnceCell<SqlitePool>,
}

impl StructuredStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a pool has been opened successfully.
    pub fn is_open(&self) -> bool {
        self.pool.initialized()
    }

    /// Opens the database, creating the schema on first use.
    pub async fn open(&self) -> Result<&SqlitePool, StoreError> {
        self.pool
            .get_or_try_init(|| async {
                tracing::debug!(path = %self.path.display(), "opening structured store");
                init_db(&self.path).await
            })
            .await
    }
}

/// Column names written on insert, after `id`.
fn write_columns(collection: Collection) -> Vec<&'static str> {
    let mut columns = vec!["data", "created_at"];
    columns.extend(collection.indexes().iter().map(|index| index.column));
    columns
}

impl RecordStore for StructuredStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        let pool = self.open().await?;

        let sql = format!("SELECT id, data FROM {} ORDER BY id", collection.name());
        let rows: Vec<RecordRow> = sqlx::query_as(&sql).fetch_all(pool).await?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn put(&self, collection: Collection, mut record: Record) -> Result<i64, StoreError> {
        let pool = self.open().await?;

        record.ensure_created_at(&now_timestamp());
        let data = serde_json::to_string(&record.body())?;
        let created_at = record.index_key(fields::CREATED_AT);
        let index_values: Vec<Option<String>> = collection
            .indexes()
            .iter()
            .map(|index| record.index_key(index.field))
            .collect();

        let columns = write_columns(collection);
        let placeholders = vec!["?"; columns.len()].join(", ");
        let table = collection.name();

        match record.id() {
            Some(id) => {
                let mut tx = pool.begin().await?;

                let assignments = columns
                    .iter()
                    .map(|column| format!("{} = ?", column))
                    .collect::<Vec<_>>()
                    .join(", ");
                let update_sql = format!("UPDATE {} SET {} WHERE id = ?", table, assignments);

                let mut update = sqlx::query(&update_sql)
                    .bind(&data)
                    .bind(created_at.as_deref());
                for value in &index_values {
                    update = update.bind(value.as_deref());
                }
                let updated = update.bind(id).execute(&mut *tx).await?;

                if updated.rows_affected() == 0 {
                    let insert_sql = format!(
                        "INSERT INTO {} (id, {}) VALUES (?, {})",
                        table,
                        columns.join(", "),
                        placeholders
                    );

                    let mut insert = sqlx::query(&insert_sql)
                        .bind(id)
                        .bind(&data)
                        .bind(created_at.as_deref());
                    for value in &index_values {
                        insert = insert.bind(value.as_deref());
                    }
                    insert.execute(&mut *tx).await?;
                }

                tx.commit().await?;
                Ok(id)
            }
            None => {
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    table,
                    columns.join(", "),
                    placeholders
                );

                let mut query = sqlx::query(&sql).bind(&data).bind(created_at.as_deref());
                for value in &index_values {
                    query = query.bind(value.as_deref());
                }
                let result = query.execute(pool).await?;

                Ok(result.last_insert_rowid())
            }
        }
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        let pool = self.open().await?;

        let sql = format!("DELETE FROM {} WHERE id = ?", collection.name());
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let pool = self.open().await?;

        let sql = format!("DELETE FROM {}", collection.name());
        sqlx::query(&sql).execute(pool).await?;

        Ok(())
    }
}
