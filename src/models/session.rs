// src/models/session.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// An identity-provider session record.
///
/// Display data plus a uid. The record gates authoring UI and nothing
/// else; the grading service never trusts it as an authorization token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,

    #[serde(rename = "displayName", default)]
    pub display_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
}

/// DTO for signing in: password credentials, or an opaque token minted by
/// a provider popup flow (e.g. Google sign-in).
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,

    pub id_token: Option<String>,
}
