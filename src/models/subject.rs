// src/models/subject.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// The subject-list document as stored: one ordered array of names.
///
/// Every edit overwrites the whole document, so two admin clients editing
/// at once race and the last writer wins. Readers see a stale list until
/// their own write commits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectList {
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// DTO for adding a subject to the catalog.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Subject name must be between 1 and 100 characters."
    ))]
    pub name: String,
}
