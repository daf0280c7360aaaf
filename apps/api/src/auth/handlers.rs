//! Axum route handlers for the Auth API.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::tokens::bearer_token;
use crate::auth::{create_user, verify_credentials};
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserRow,
    /// Send as `Authorization: Bearer <token>` to own sessions and to log out.
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub username: String,
    pub sessions_closed: usize,
}

impl CredentialsRequest {
    fn validated(&self) -> Result<(&str, &str), AppError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        Ok((username, &self.password))
    }
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    let (username, password) = request.validated()?;
    let user = create_user(&state.db, username, password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (username, password) = request.validated()?;
    let user = verify_credentials(&state.db, username, password).await?;
    let token = state.tokens.issue(&user.username).await;
    info!("User {} logged in", user.username);
    Ok(Json(LoginResponse { user, token }))
}

/// POST /api/v1/auth/logout (`Authorization: Bearer <token>`)
///
/// Revokes the token and discards every interview session owned by its user.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AppError> {
    let token = bearer_token(&headers)?
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
    let username = state.tokens.revoke(token).await.ok_or_else(|| {
        warn!("Logout attempted with an unknown or expired token");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let sessions_closed = state.sessions.remove_owned_by(&username).await;
    info!("User {username} logged out, closed {sessions_closed} sessions");
    Ok(Json(LogoutResponse {
        username,
        sessions_closed,
    }))
}
