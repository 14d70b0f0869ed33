// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{delete, get, post, put},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{answers, attempts, auth, results, subjects},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Phone photos of a sheet top out well under this.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, subjects, attempts, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // let governor_conf = GovernorConfigBuilder::default()
    //     .per_second(2)
    //     .burst_size(5)
    //     .finish()
    //     .unwrap();

    // let governor_conf = Arc::new(governor_conf);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let subject_routes = Router::new().route("/", get(subjects::list_subjects));

    let attempt_routes = Router::new()
        .route("/", post(attempts::create_attempt))
        .route("/{id}", get(attempts::get_attempt))
        .route("/{id}/subject", put(attempts::choose_subject))
        .route("/{id}/image", put(attempts::upload_image))
        .route("/{id}/submit", post(attempts::submit))
        .route("/{id}/result", get(attempts::get_result))
        .route("/{id}/reset", post(attempts::reset))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    // Authoring surface: every route sits behind the session gate, which
    // also live-confirms the cached session with the identity provider.
    let admin_routes = Router::new()
        .route("/subjects", post(subjects::create_subject))
        .route("/subjects/{index}", delete(subjects::delete_subject))
        .route(
            "/answers/{subject}",
            get(answers::get_answer_key).put(answers::put_answer_key),
        )
        .route("/answers/{subject}/resize", post(answers::resize_answer_key))
        .route("/results/{roll_no}", get(results::get_result))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/subjects", subject_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // .layer(GovernorLayer::new(governor_conf))
        .with_state(state)
}
