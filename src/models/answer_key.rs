// src/models/answer_key.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::AppError;

/// The expected-answer key for one subject.
///
/// Ordinals always form the contiguous range `1..=count`: growing the key
/// keeps previously entered tokens and pads the tail with empty
/// placeholders, shrinking drops the tail. Stored as `{"q1": "A", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    answers: BTreeMap<u32, String>,
}

impl AnswerKey {
    pub fn question_count(&self) -> u32 {
        self.answers.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// The expected token for an ordinal, `None` beyond the current count.
    pub fn token(&self, ordinal: u32) -> Option<&str> {
        self.answers.get(&ordinal).map(String::as_str)
    }

    /// Re-derives the key at a new question count.
    ///
    /// Pure: the receiver is untouched, callers must use the returned key.
    pub fn resized(&self, count: u32) -> AnswerKey {
        let answers = (1..=count)
            .map(|i| (i, self.answers.get(&i).cloned().unwrap_or_default()))
            .collect();
        AnswerKey { answers }
    }

    /// Sets the expected token for an ordinal already covered by the key.
    /// Ordinals beyond the current count are ignored; grow the key first.
    pub fn set_answer(&mut self, ordinal: u32, token: impl Into<String>) {
        if self.answers.contains_key(&ordinal) {
            self.answers.insert(ordinal, token.into());
        }
    }

    /// Parses a stored key document. The count is the highest `qN` field
    /// present; holes left by partial merges read as empty placeholders.
    pub fn from_document(doc: &Value) -> AnswerKey {
        let mut parsed = BTreeMap::new();
        let mut max = 0u32;
        if let Some(map) = doc.as_object() {
            for (field, token) in map {
                let Some(ordinal) = parse_ordinal(field) else {
                    continue;
                };
                if ordinal == 0 {
                    continue;
                }
                max = max.max(ordinal);
                parsed.insert(ordinal, token.as_str().unwrap_or_default().to_string());
            }
        }
        let answers = (1..=max)
            .map(|i| (i, parsed.remove(&i).unwrap_or_default()))
            .collect();
        AnswerKey { answers }
    }

    /// Renders the key in its stored wire shape.
    pub fn to_document(&self) -> Value {
        let mut map = Map::new();
        for (ordinal, token) in &self.answers {
            map.insert(format!("q{ordinal}"), Value::String(token.clone()));
        }
        Value::Object(map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.answers.iter().map(|(ordinal, token)| (*ordinal, token.as_str()))
    }
}

fn parse_ordinal(field: &str) -> Option<u32> {
    field.strip_prefix('q')?.parse().ok()
}

/// DTO for re-deriving a key at a new question count.
#[derive(Debug, Deserialize, Validate)]
pub struct ResizeKeyRequest {
    #[validate(range(max = 500, message = "Question count must be at most 500."))]
    pub count: u32,
}

/// DTO for committing an authored key, in the stored document shape.
#[derive(Debug, Deserialize)]
pub struct CommitKeyRequest {
    pub answers: Map<String, Value>,
}

impl CommitKeyRequest {
    pub fn into_key(self) -> Result<AnswerKey, AppError> {
        for (field, token) in &self.answers {
            let Some(token) = token.as_str() else {
                return Err(AppError::Validation(format!(
                    "Answer for '{field}' must be a string"
                )));
            };
            if token.len() > 50 {
                return Err(AppError::Validation(format!(
                    "Answer for '{field}' is too long"
                )));
            }
        }
        Ok(AnswerKey::from_document(&Value::Object(self.answers)))
    }
}

/// DTO echoing a key back to the authoring UI.
#[derive(Debug, Serialize)]
pub struct AnswerKeyResponse {
    pub subject: String,
    pub count: u32,
    pub answers: Value,
}

impl AnswerKeyResponse {
    pub fn new(subject: String, key: &AnswerKey) -> Self {
        Self {
            subject,
            count: key.question_count(),
            answers: key.to_document(),
        }
    }
}
