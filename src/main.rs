// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use omr_backend::catalog::SubjectCatalog;
use omr_backend::config::Config;
use omr_backend::grading::HttpGradingService;
use omr_backend::identity::HttpIdentityProvider;
use omr_backend::routes;
use omr_backend::state::AppState;
use omr_backend::store::{DocumentStore, PgStore};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    let store: Arc<dyn DocumentStore> = Arc::new(PgStore::new(pool));

    // Seed Subjects
    if let Err(e) = seed_subjects(store.clone(), &config).await {
        tracing::error!("Failed to seed subjects: {:?}", e);
    }

    let grader = Arc::new(
        HttpGradingService::new(&config.grading_service_url, config.grading_timeout_secs)
            .expect("Failed to build the grading service client"),
    );
    let identity = Arc::new(
        HttpIdentityProvider::new(&config.identity_provider_url)
            .expect("Failed to build the identity provider client"),
    );

    // Create AppState
    let state = AppState::new(config, store, identity, grader);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

/// Seeds the subject catalog from SEED_SUBJECTS ("Math,Physics") when the
/// store has never been written. Useful for fresh deployments.
async fn seed_subjects(
    store: Arc<dyn DocumentStore>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(seed) = &config.seed_subjects else {
        return Ok(());
    };

    let catalog = SubjectCatalog::new(store);
    if !catalog.list().await?.is_empty() {
        return Ok(());
    }

    for name in seed.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        tracing::info!("Seeding subject: {}", name);
        catalog.add(name).await?;
    }
    Ok(())
}
