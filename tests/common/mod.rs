//! Shared test infrastructure.
//!
//! Every test gets its own in-memory SQLite database with the full schema.
//! The pool is pinned to a single connection that never idles out, since
//! each new in-memory connection would otherwise see an empty database.

#![allow(dead_code)]

use std::str::FromStr;

use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use formcraft::auth::password;
use formcraft::db::{DbPool, MIGRATIONS};
use formcraft::models::user;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const OWNER_EMAIL: &str = "owner@example.com";
pub const OTHER_EMAIL: &str = "other@example.com";
pub const TEST_PASSWORD: &str = "password123";

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub async fn setup_test_db() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Insert an account and return its id.
pub async fn create_user(pool: &DbPool, email: &str) -> String {
    let hash = password::hash_password(TEST_PASSWORD).expect("hash password");
    user::create(pool, email, &hash).await.expect("create user")
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Two questions: a required short answer and an optional checkbox.
pub fn sample_questions() -> Value {
    json!([
        { "id": "q1", "type": "short", "text": "Name", "required": true },
        {
            "id": "q2",
            "type": "checkbox",
            "text": "Colors",
            "required": false,
            "options": ["Red", "Blue", "Green"]
        }
    ])
}
