use serde_json::Value;

use crate::auth::token;
use crate::db::{self, DbPool};
use crate::errors::AppError;
use crate::models::form;
use super::types::*;

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: String,
    form_id: String,
    answers_json: String,
    created_at: String,
}

/// Store one submission for `form_id`. The payload is stored verbatim.
///
/// With `enforce_required` the payload is also checked against the form's
/// current required questions.
pub async fn submit(
    pool: &DbPool,
    form_id: &str,
    raw_answers: &Value,
    enforce_required: bool,
) -> Result<String, AppError> {
    let form = form::find_by_id(pool, form_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;

    let items = raw_answers
        .as_array()
        .ok_or_else(|| AppError::Validation("Invalid response format".to_string()))?;
    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(AppError::Validation(format!(
            "Invalid response format: answer {} is not an object",
            index + 1
        )));
    }

    if enforce_required {
        let answers = items
            .iter()
            .map(|item| serde_json::from_value::<Answer>(item.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Validation(format!("Invalid response format: {e}")))?;
        let missing = missing_required(&form.questions, &answers);
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|q| q.text.as_str()).collect();
            return Err(AppError::Validation(format!(
                "Missing answers for required questions: {}",
                names.join(", ")
            )));
        }
    }

    let id = token::generate_id();
    sqlx::query(
        "INSERT INTO responses (id, form_id, answers_json, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&id)
    .bind(form_id)
    .bind(raw_answers.to_string())
    .bind(db::now())
    .execute(pool)
    .await?;

    log::info!("Response {id} stored for form {form_id} ({} answers)", items.len());
    Ok(id)
}

pub async fn count(pool: &DbPool, form_id: &str) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM responses WHERE form_id = ?1")
        .bind(form_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// All responses for a form, newest first.
pub async fn list(pool: &DbPool, form_id: &str) -> Result<Vec<Response>, AppError> {
    let rows = sqlx::query_as::<_, ResponseRow>(
        "SELECT id, form_id, answers_json, created_at FROM responses \
         WHERE form_id = ?1 ORDER BY created_at DESC, rowid DESC",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Response {
            answers: parse_stored_answers(&row.id, &row.answers_json),
            id: row.id,
            form_id: row.form_id,
            created_at: row.created_at,
        })
        .collect())
}

/// Read-side only: a damaged row shows up with fewer (or no) answers
/// instead of failing the whole listing.
fn parse_stored_answers(response_id: &str, json: &str) -> Vec<Answer> {
    let items: Vec<Value> = match serde_json::from_str(json) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Unreadable answers for response {response_id}: {e}");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Answer>(item) {
            Ok(answer) => Some(answer),
            Err(e) => {
                log::warn!("Skipping malformed answer in response {response_id}: {e}");
                None
            }
        })
        .collect()
}
