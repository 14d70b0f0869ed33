// src/config.rs

use std::env;
use dotenvy::dotenv;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub grading_service_url: String,
    pub grading_timeout_secs: u64,
    pub identity_provider_url: String,
    pub rust_log: String,
    pub seed_subjects: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let grading_service_url = env::var("GRADING_SERVICE_URL")
            .expect("GRADING_SERVICE_URL must be set");
        Url::parse(&grading_service_url).expect("GRADING_SERVICE_URL must be a valid URL");

        let grading_timeout_secs = env::var("GRADING_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let identity_provider_url = env::var("IDENTITY_PROVIDER_URL")
            .expect("IDENTITY_PROVIDER_URL must be set");
        Url::parse(&identity_provider_url).expect("IDENTITY_PROVIDER_URL must be a valid URL");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let seed_subjects = env::var("SEED_SUBJECTS").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            grading_service_url,
            grading_timeout_secs,
            identity_provider_url,
            rust_log,
            seed_subjects,
        }
    }
}
