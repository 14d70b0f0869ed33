// src/keystore.rs

use std::sync::Arc;

use crate::{error::AppError, models::answer_key::AnswerKey, store::DocumentStore};

const COLLECTION: &str = "answers";

fn doc_id(subject: &str) -> String {
    format!("{subject}_answers")
}

/// Loads and commits per-subject answer keys.
///
/// Commits are merge-writes: two operators editing disjoint ordinals of
/// the same subject both keep their entries, unlike the subject list's
/// whole-document overwrite.
#[derive(Clone)]
pub struct AnswerKeyStore {
    store: Arc<dyn DocumentStore>,
}

impl AnswerKeyStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The stored key for a subject; an empty key when none exists yet.
    pub async fn load(&self, subject: &str) -> Result<AnswerKey, AppError> {
        let Some(doc) = self.store.get(COLLECTION, &doc_id(subject)).await? else {
            return Ok(AnswerKey::default());
        };
        Ok(AnswerKey::from_document(&doc))
    }

    /// Merge-writes the key into the subject's stored document.
    /// There is no automatic retry; the caller surfaces the failure.
    pub async fn commit(&self, subject: &str, key: &AnswerKey) -> Result<(), AppError> {
        self.store
            .merge(COLLECTION, &doc_id(subject), key.to_document())
            .await
    }
}
