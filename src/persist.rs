// src/persist.rs

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{error::AppError, models::result::StoredResult, store::DocumentStore};

const COLLECTION: &str = "results";

static ROLL_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("roll number pattern"));

/// Records completed grading results, keyed by candidate roll number.
///
/// Re-scanning the same roll number overwrites the previous record;
/// results are never merged.
#[derive(Clone)]
pub struct ResultRecorder {
    store: Arc<dyn DocumentStore>,
}

impl ResultRecorder {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn doc_id(roll_no: &str) -> String {
        format!("roll_no_{roll_no}")
    }

    pub async fn record(&self, result: &StoredResult) -> Result<(), AppError> {
        // The roll number comes back from the grading service, not from a
        // validated request body, and it becomes a storage key.
        if !ROLL_NO_RE.is_match(&result.roll_no) {
            return Err(AppError::Validation(format!(
                "Roll number '{}' cannot be used as a storage key",
                result.roll_no
            )));
        }

        let doc = serde_json::to_value(result)?;
        self.store
            .put(COLLECTION, &Self::doc_id(&result.roll_no), doc)
            .await
    }

    /// Reads back a stored result by roll number.
    pub async fn fetch(&self, roll_no: &str) -> Result<Option<StoredResult>, AppError> {
        let Some(doc) = self.store.get(COLLECTION, &Self::doc_id(roll_no)).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(doc)?))
    }
}
