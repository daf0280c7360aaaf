// Credential store: salted SHA-256 password hashes in the Postgres `users` table.
// A successful login issues an opaque bearer token. Interview sessions started
// with that token are owned by the user, and logout with it discards them.

pub mod handlers;
pub mod tokens;

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

/// Hex-encoded SHA-256 of `salt:password`.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn verify_password(user: &UserRow, password: &str) -> bool {
    hash_password(&user.password_salt, password) == user.password_hash
}

/// Inserts a new user. A taken username is a `Conflict`.
pub async fn create_user(pool: &PgPool, username: &str, password: &str) -> Result<UserRow, AppError> {
    let salt = new_salt();
    let hash = hash_password(&salt, password);

    let row: Option<UserRow> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, password_hash, password_salt)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(&hash)
    .bind(&salt)
    .fetch_optional(pool)
    .await?;

    let user = row.ok_or_else(|| AppError::Conflict("Username already exists".to_string()))?;
    info!("Created user {}", user.username);
    Ok(user)
}

/// Looks the user up and checks the password. Unknown user and wrong password
/// are indistinguishable to the caller.
pub async fn verify_credentials(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> Result<UserRow, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    match user {
        Some(user) if verify_password(&user, password) => Ok(user),
        _ => Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(password: &str) -> UserRow {
        let salt = new_salt();
        UserRow {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            password_hash: hash_password(&salt, password),
            password_salt: salt,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_is_deterministic_hex() {
        let a = hash_password("salt", "hunter2");
        assert_eq!(a, hash_password("salt", "hunter2"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(hash_password("a", "hunter2"), hash_password("b", "hunter2"));
        assert_ne!(new_salt(), new_salt());
    }

    #[test]
    fn test_verify_password() {
        let user = user_with("correct horse");
        assert!(verify_password(&user, "correct horse"));
        assert!(!verify_password(&user, "correct horse "));
        assert!(!verify_password(&user, ""));
    }

    #[test]
    fn test_user_row_serialization_hides_hash() {
        let json = serde_json::to_value(user_with("pw")).unwrap();
        assert_eq!(json["username"], "ada");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password_salt").is_none());
    }
}
