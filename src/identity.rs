// src/identity.rs

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::{
    error::AppError,
    models::session::{Session, SignInRequest},
};

/// Failure reasons for identity operations. An abandoned popup is its
/// own reason so callers can tell it apart from a rejected credential.
#[derive(Debug)]
pub enum IdentityError {
    Rejected(String),
    Cancelled,
    Unavailable(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Rejected(msg) => write!(f, "sign-in rejected: {}", msg),
            IdentityError::Cancelled => write!(f, "sign-in cancelled"),
            IdentityError::Unavailable(msg) => write!(f, "identity provider unavailable: {}", msg),
        }
    }
}

impl std::error::Error for IdentityError {}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected(msg) => AppError::AuthError(msg),
            IdentityError::Cancelled => AppError::AuthCancelled,
            IdentityError::Unavailable(msg) => AppError::Transport(msg),
        }
    }
}

/// The external identity provider at its interface boundary: one call to
/// exchange credentials for a session, one to confirm a cached uid is
/// still signed in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &SignInRequest) -> Result<Session, IdentityError>;

    /// Live confirmation that the provider still recognizes this uid.
    /// `None` means the provider no longer vouches for the session.
    async fn confirm(&self, uid: &str) -> Result<Option<Session>, IdentityError>;
}

/// reqwest-backed client for the identity provider's session endpoints.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, credentials: &SignInRequest) -> Result<Session, IdentityError> {
        let response = self
            .client
            .post(format!("{}/api/sessions", self.base_url))
            .json(credentials)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK {
            return response
                .json::<Session>()
                .await
                .map_err(|e| IdentityError::Unavailable(e.to_string()));
        }

        let body: Value = response.json().await.unwrap_or_default();
        if body.get("error").and_then(Value::as_str) == Some("popup_closed") {
            return Err(IdentityError::Cancelled);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(IdentityError::Rejected("Invalid credentials".to_string()));
        }
        Err(IdentityError::Unavailable(format!(
            "identity provider returned {}",
            status
        )))
    }

    async fn confirm(&self, uid: &str) -> Result<Option<Session>, IdentityError> {
        let response = self
            .client
            .get(format!("{}/api/sessions/{}", self.base_url, uid))
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let session = response
                    .json::<Session>()
                    .await
                    .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
                Ok(Some(session))
            }
            StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED | StatusCode::GONE => Ok(None),
            status => Err(IdentityError::Unavailable(format!(
                "identity provider returned {}",
                status
            ))),
        }
    }
}
