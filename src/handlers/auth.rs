// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::session::{Session, SignInRequest},
    state::AppState,
    utils::jwt::sign_jwt,
};

/// Signs a user in by delegating the credentials to the identity
/// provider, then hands back a session token for the authoring routes.
///
/// The provider tells an abandoned popup apart from a rejected
/// credential; both come back as 401, with different reasons.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    if payload.id_token.is_none() && (payload.email.is_none() || payload.password.is_none()) {
        return Err(AppError::Validation(
            "Provide either an email and password or a provider token".to_string(),
        ));
    }

    let session = state.identity.sign_in(&payload).await?;

    // First sign-in creates the user document; later ones refresh it.
    // A failed upsert does not block the sign-in itself.
    let user_doc = serde_json::to_value(&session)?;
    if let Err(e) = state.store.merge("users", &session.uid, user_doc).await {
        tracing::error!("Failed to upsert user record for {}: {:?}", session.uid, e);
    }

    let token = sign_jwt(
        &session.uid,
        &session.email,
        &state.config.jwt_secret,
        state.config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": session,
    })))
}

/// Echoes the live-confirmed session for the bearer of the token.
pub async fn me(Extension(session): Extension<Session>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(session))
}
