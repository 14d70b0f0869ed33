// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::error::AppError;

/// In-memory document store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, doc_id: &str) -> Result<Option<Value>, AppError> {
        let docs = self.docs.read().await;
        Ok(docs.get(&(collection.to_string(), doc_id.to_string())).cloned())
    }

    async fn put(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        docs.insert((collection.to_string(), doc_id.to_string()), data);
        Ok(())
    }

    async fn merge(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        let key = (collection.to_string(), doc_id.to_string());
        let merged = match (docs.remove(&key), data) {
            (Some(Value::Object(mut current)), Value::Object(incoming)) => {
                current.extend(incoming);
                Value::Object(current)
            }
            (_, incoming) => incoming,
        };
        docs.insert(key, merged);
        Ok(())
    }
}
