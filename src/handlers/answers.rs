// src/handlers/answers.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    keystore::AnswerKeyStore,
    models::answer_key::{AnswerKeyResponse, CommitKeyRequest, ResizeKeyRequest},
};

/// Loads a subject's current key. An absent key reads as empty (count
/// zero), not as an error.
pub async fn get_answer_key(
    State(keys): State<AnswerKeyStore>,
    Path(subject): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let key = keys.load(&subject).await?;
    Ok(Json(AnswerKeyResponse::new(subject, &key)))
}

/// Re-derives the key at a new question count without committing it.
/// Answers already entered for ordinals up to the new count survive.
pub async fn resize_answer_key(
    State(keys): State<AnswerKeyStore>,
    Path(subject): Path<String>,
    Json(payload): Json<ResizeKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let key = keys.load(&subject).await?.resized(payload.count);
    Ok(Json(AnswerKeyResponse::new(subject, &key)))
}

/// Merge-commits an authored key. Entries another session committed for
/// other ordinals survive.
pub async fn put_answer_key(
    State(keys): State<AnswerKeyStore>,
    Path(subject): Path<String>,
    Json(payload): Json<CommitKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key = payload.into_key()?;
    if key.is_empty() {
        return Err(AppError::Validation(
            "Set the number of questions first".to_string(),
        ));
    }

    keys.commit(&subject, &key).await?;
    Ok(Json(serde_json::json!({
        "message": "Answers added successfully",
        "count": key.question_count(),
    })))
}
