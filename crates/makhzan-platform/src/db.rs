use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use makhzan_core::{RecordStore, StoreError};
use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};

pub async fn connect_database(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Record store over a single PostgreSQL table of JSONB documents keyed by
/// collection and id.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query(
            "SELECT data FROM records WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.iter()
            .map(|row| row.try_get::<Value, _>("data").map_err(store_error))
            .collect()
    }

    async fn upsert(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO records (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(record)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(err.to_string())
        }
        other => StoreError::Storage(other.to_string()),
    }
}
