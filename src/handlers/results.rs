// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, persist::ResultRecorder};

/// Reads back a stored grading result by roll number.
/// Authenticated authoring only.
pub async fn get_result(
    State(results): State<ResultRecorder>,
    Path(roll_no): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let stored = results.fetch(&roll_no).await?.ok_or_else(|| {
        AppError::NotFound(format!("No result stored for roll number {roll_no}"))
    })?;
    Ok(Json(stored))
}
