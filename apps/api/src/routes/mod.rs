pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::resume::handlers as resume;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resume::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Sessions API
        .route("/api/v1/sessions", post(session::handle_start_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(session::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/restart",
            post(session::handle_restart_session),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            get(session::handle_session_summary),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(session::handle_session_report),
        )
        .with_state(state)
}
