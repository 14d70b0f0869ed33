// src/models/result.rs

use serde::{Deserialize, Serialize};

/// Per-question verdict as judged by the grading service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Correct,
    /// Older grading-service deployments emit "wrong" for this verdict.
    #[serde(alias = "wrong")]
    Incorrect,
}

/// One entry of the grading service's marked-question sequence, in sheet
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedQuestion {
    /// Question label like "q1"; not every service version includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub marker: Marker,
}

/// The grading service's verdict for one uploaded sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    pub score: i64,
    pub roll_no: String,
    pub answers: Vec<String>,
    pub marked_questions: Vec<MarkedQuestion>,
}

/// The persisted record for one graded sheet, keyed by roll number.
/// Re-scanning the same roll number replaces the previous record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub subject: String,
    pub score: i64,
    pub roll_no: String,
    pub answers: Vec<String>,
    pub marked_questions: Vec<MarkedQuestion>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
