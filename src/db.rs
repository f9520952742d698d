use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::auth::password;
use crate::errors::AppError;
use crate::models::user;

pub type DbPool = SqlitePool;

pub const MIGRATIONS: &str = include_str!("schema.sql");

/// Timestamp format stored in every `created_at` column. Lexically sortable.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub async fn init_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the configured default account unless it already exists.
pub async fn seed_default_user(pool: &DbPool, email: &str, plain_password: &str) -> Result<(), AppError> {
    if user::find_by_email(pool, email).await?.is_some() {
        log::info!("Default user {email} already present, skipping seed");
        return Ok(());
    }
    let hash = password::hash_password(plain_password).map_err(AppError::Hash)?;
    user::create(pool, email, &hash).await?;
    log::info!("Seeded default user {email}");
    Ok(())
}

pub fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now() -> String {
    timestamp(chrono::Utc::now())
}
