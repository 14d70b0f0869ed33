// src/grading.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::{error::AppError, models::result::GradeReport, workflow::SheetImage};

/// The external grading service at its interface boundary.
#[async_trait]
pub trait GradingService: Send + Sync {
    /// Submits one sheet image for grading against a subject's key.
    /// The key itself never travels with the request; the service holds it.
    async fn grade(&self, subject: &str, image: &SheetImage) -> Result<GradeReport, AppError>;
}

/// reqwest client for the grading service's multipart upload endpoint.
pub struct HttpGradingService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGradingService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AppError> {
        // The upstream call has no timeout of its own; the bounded client
        // timeout is what turns a hung request into a retryable failure.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GradingService for HttpGradingService {
    async fn grade(&self, subject: &str, image: &SheetImage) -> Result<GradeReport, AppError> {
        let file_part = multipart::Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("subject", subject.to_string());

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "grading service returned {}",
                response.status()
            )));
        }

        Ok(response.json::<GradeReport>().await?)
    }
}
