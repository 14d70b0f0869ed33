// src/store/mod.rs

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

/// Key-value document storage with the two write shapes the app relies
/// on: whole-document overwrite and shallow field-by-field merge.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document; `None` when it has never been written.
    async fn get(&self, collection: &str, doc_id: &str) -> Result<Option<Value>, AppError>;

    /// Replaces the whole document, creating it if absent.
    /// Concurrent writers race; the last one wins.
    async fn put(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError>;

    /// Merges top-level fields into the document, creating it if absent.
    /// Concurrent merges of disjoint fields both survive.
    async fn merge(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError>;
}
