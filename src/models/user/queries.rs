use chrono::{DateTime, Utc};

use crate::auth::token;
use crate::db::{self, DbPool};
use crate::errors::AppError;
use super::types::User;

const SELECT_USER: &str = "SELECT id, email, password_hash, created_at FROM users";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account. Returns the new user id.
pub async fn create(pool: &DbPool, email: &str, password_hash: &str) -> Result<String, AppError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    if find_by_email(pool, &email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let id = token::generate_id();
    sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(&email)
        .bind(password_hash)
        .bind(db::now())
        .execute(pool)
        .await?;
    Ok(id)
}

pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = ?1"))
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn exists(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Store a reset token for `email`. Returns false when no such account exists.
pub async fn set_reset_token(
    pool: &DbPool,
    email: &str,
    reset_token: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE users SET reset_token = ?1, reset_token_expiry = ?2 WHERE email = ?3",
    )
    .bind(reset_token)
    .bind(db::timestamp(expires_at))
    .bind(normalize_email(email))
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// The account holding `reset_token`, provided the token has not expired at `now`.
pub async fn find_by_reset_token(
    pool: &DbPool,
    reset_token: &str,
    now: DateTime<Utc>,
) -> Result<Option<User>, AppError> {
    if reset_token.is_empty() {
        return Ok(None);
    }
    let user = sqlx::query_as::<_, User>(&format!(
        "{SELECT_USER} WHERE reset_token = ?1 AND reset_token_expiry > ?2"
    ))
    .bind(reset_token)
    .bind(db::timestamp(now))
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Replace the password hash and invalidate any outstanding reset token.
pub async fn update_password(pool: &DbPool, id: &str, password_hash: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET password_hash = ?1, reset_token = NULL, reset_token_expiry = NULL \
         WHERE id = ?2",
    )
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
