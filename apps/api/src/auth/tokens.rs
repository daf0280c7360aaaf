//! Opaque bearer tokens issued at login.
//!
//! A token maps to the username it was issued for. It is the only way to claim
//! ownership of an interview session or to log out, so a bare username in a
//! request body never grants anything.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::store::is_expired;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Debug, Clone)]
struct IssuedToken {
    username: String,
    issued_at: DateTime<Utc>,
}

/// Process-local token table. Tokens are lost on restart and expire after `ttl`.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<RwLock<HashMap<String, IssuedToken>>>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TOKEN_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Issues a fresh token for `username`, pruning expired ones first.
    pub async fn issue(&self, username: &str) -> String {
        let token = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        let now = Utc::now();

        let mut tokens = self.inner.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !is_expired(t.issued_at, self.ttl, now));
        if tokens.len() < before {
            debug!("Pruned {} expired tokens", before - tokens.len());
        }
        tokens.insert(
            token.clone(),
            IssuedToken {
                username: username.to_string(),
                issued_at: now,
            },
        );
        token
    }

    /// Username for a live token.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .get(token)
            .filter(|t| !is_expired(t.issued_at, self.ttl, Utc::now()))
            .map(|t| t.username.clone())
    }

    /// Invalidates a token, returning its username if it was live.
    pub async fn revoke(&self, token: &str) -> Option<String> {
        self.inner
            .write()
            .await
            .remove(token)
            .filter(|t| !is_expired(t.issued_at, self.ttl, Utc::now()))
            .map(|t| t.username)
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The token from an `Authorization: Bearer <token>` header, if one was sent.
/// A malformed header is rejected rather than ignored.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Some)
        .ok_or_else(|| {
            warn!("Invalid Authorization header format");
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })
}

/// Resolves the caller's username from an optional bearer token.
/// No header means an anonymous caller; an unknown or expired token is an error.
pub async fn caller(tokens: &TokenStore, headers: &HeaderMap) -> Result<Option<String>, AppError> {
    match bearer_token(headers)? {
        None => Ok(None),
        Some(token) => tokens
            .resolve(token)
            .await
            .map(Some)
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string())),
    }
}
