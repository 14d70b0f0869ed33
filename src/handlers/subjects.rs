// src/handlers/subjects.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{catalog::SubjectCatalog, error::AppError, models::subject::CreateSubjectRequest};

/// Lists subjects in authoring order. Public: the scan flow reads it to
/// populate the subject picker.
pub async fn list_subjects(
    State(catalog): State<SubjectCatalog>,
) -> Result<impl IntoResponse, AppError> {
    let subjects = catalog.list().await?;
    Ok(Json(serde_json::json!({ "subjects": subjects })))
}

/// Appends a subject to the catalog.
/// Authenticated authoring only.
pub async fn create_subject(
    State(catalog): State<SubjectCatalog>,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let subjects = catalog.add(&payload.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subjects": subjects })),
    ))
}

/// Removes the subject at a position. An out-of-range index is a 400,
/// never a silent no-op.
/// Authenticated authoring only.
pub async fn delete_subject(
    State(catalog): State<SubjectCatalog>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    let subjects = catalog.remove_at(index).await?;
    Ok(Json(serde_json::json!({ "subjects": subjects })))
}
