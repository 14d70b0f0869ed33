// src/store/postgres.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::DocumentStore;
use crate::error::AppError;

/// Document store over a single Postgres JSONB table.
///
/// `merge` leans on the JSONB `||` operator, which combines top-level
/// fields the same way the upstream store's merge-write does.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, doc_id: &str) -> Result<Option<Value>, AppError> {
        let data: Option<Value> = sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND doc_id = $2",
        )
        .bind(collection)
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(data)
    }

    async fn put(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, doc_id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(doc_id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn merge(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, doc_id)
            DO UPDATE SET data = documents.data || EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(doc_id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
