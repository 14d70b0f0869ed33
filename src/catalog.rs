// src/catalog.rs

use std::sync::Arc;

use crate::{
    error::AppError, models::subject::SubjectList, store::DocumentStore, utils::html::clean_html,
};

const COLLECTION: &str = "subject";
const DOC_ID: &str = "subjects";

/// The ordered, mutable set of subject names.
///
/// The document store holds the authoritative list; every edit reads the
/// current list and overwrites the whole document. Two admin clients
/// editing at once therefore race and the last writer wins — readers
/// must tolerate a stale list until their own write commits.
#[derive(Clone)]
pub struct SubjectCatalog {
    store: Arc<dyn DocumentStore>,
}

impl SubjectCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ordered subject names; empty when nothing has been authored yet.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let Some(doc) = self.store.get(COLLECTION, DOC_ID).await? else {
            return Ok(Vec::new());
        };
        let list: SubjectList = serde_json::from_value(doc)?;
        Ok(list.subjects)
    }

    /// Appends a subject and overwrites the stored list.
    ///
    /// Blank names and duplicates are rejected before any write happens,
    /// so a failed write leaves nothing to roll back.
    pub async fn add(&self, name: &str) -> Result<Vec<String>, AppError> {
        let name = clean_html(name.trim());
        if name.is_empty() {
            return Err(AppError::Validation(
                "Subject name cannot be blank".to_string(),
            ));
        }

        let mut subjects = self.list().await?;
        if subjects.iter().any(|existing| existing == &name) {
            return Err(AppError::Conflict(format!(
                "Subject '{}' already exists",
                name
            )));
        }

        subjects.push(name);
        self.overwrite(&subjects).await?;
        Ok(subjects)
    }

    /// Removes the subject at `index` and overwrites the stored list.
    /// An out-of-range index fails fast rather than clamping.
    pub async fn remove_at(&self, index: usize) -> Result<Vec<String>, AppError> {
        let mut subjects = self.list().await?;
        if index >= subjects.len() {
            return Err(AppError::Validation(format!(
                "Subject index {} is out of range (0..{})",
                index,
                subjects.len()
            )));
        }

        subjects.remove(index);
        self.overwrite(&subjects).await?;
        Ok(subjects)
    }

    pub async fn contains(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.list().await?.iter().any(|existing| existing == name))
    }

    async fn overwrite(&self, subjects: &[String]) -> Result<(), AppError> {
        let doc = serde_json::to_value(SubjectList {
            subjects: subjects.to_vec(),
        })?;
        self.store.put(COLLECTION, DOC_ID, doc).await
    }
}
