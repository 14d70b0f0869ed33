// src/handlers/attempts.rs

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    catalog::SubjectCatalog,
    error::AppError,
    view::ResultView,
    workflow::{Attempt, SheetImage, SubmissionWorkflow},
};

/// DTO for choosing the attempt's subject.
#[derive(Debug, Deserialize, Validate)]
pub struct ChooseSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
}

fn attempt_json(attempt: &Attempt) -> serde_json::Value {
    serde_json::json!({
        "id": attempt.id,
        "state": attempt.state.label(),
        "subject": attempt.state.subject(),
    })
}

/// Opens a fresh attempt in the Idle state.
pub async fn create_attempt(
    State(workflow): State<SubmissionWorkflow>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = workflow.create_attempt().await;
    Ok((StatusCode::CREATED, Json(attempt_json(&attempt))))
}

/// Current position of an attempt in the workflow.
pub async fn get_attempt(
    State(workflow): State<SubmissionWorkflow>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = workflow.get(id).await?;
    Ok(Json(attempt_json(&attempt)))
}

/// Chooses the subject for an attempt. Re-choosing clears any selected
/// image; the sheet must be captured again against the new subject.
pub async fn choose_subject(
    State(workflow): State<SubmissionWorkflow>,
    State(catalog): State<SubjectCatalog>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChooseSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    if !catalog.contains(&payload.subject).await? {
        return Err(AppError::Validation(format!(
            "Unknown subject '{}'",
            payload.subject
        )));
    }

    let attempt = workflow.choose_subject(id, payload.subject).await?;
    Ok(Json(attempt_json(&attempt)))
}

/// Attaches the sheet photo from a multipart `file` field.
pub async fn upload_image(
    State(workflow): State<SubmissionWorkflow>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut image: Option<SheetImage> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("sheet.jpg").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        image = Some(SheetImage {
            file_name,
            content_type,
            bytes,
        });
    }

    let image = image.ok_or_else(|| AppError::Validation("A 'file' field is required".to_string()))?;
    if image.bytes.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty".to_string()));
    }

    let attempt = workflow.select_image(id, image).await?;
    Ok(Json(attempt_json(&attempt)))
}

/// Sends the sheet to the grading service and waits for the verdict.
pub async fn submit(
    State(workflow): State<SubmissionWorkflow>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = workflow.submit(id).await?;
    Ok(Json(report))
}

/// The graded result. 404 until the attempt is actually graded: an
/// ungraded attempt has no result, not a score of zero.
pub async fn get_result(
    State(workflow): State<SubmissionWorkflow>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = workflow.get(id).await?;
    let view = ResultView::project(&attempt)
        .ok_or_else(|| AppError::NotFound("Result not ready".to_string()))?;
    Ok(Json(view))
}

/// Discards the attempt and returns it to Idle.
pub async fn reset(
    State(workflow): State<SubmissionWorkflow>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = workflow.reset(id).await?;
    Ok(Json(attempt_json(&attempt)))
}
