use serde_json::Value;

use crate::auth::token;
use crate::db::{self, DbPool};
use crate::errors::AppError;
use crate::models::question::{self, NormalizePolicy};
use crate::models::user;
use super::types::*;

const SELECT_FORM: &str = "\
    SELECT id, owner_id, title, description, questions_json, created_at, share_id \
    FROM forms";

#[derive(sqlx::FromRow)]
struct FormRow {
    id: String,
    owner_id: String,
    title: String,
    description: String,
    questions_json: String,
    created_at: String,
    share_id: String,
}

impl TryFrom<FormRow> for Form {
    type Error = AppError;

    fn try_from(row: FormRow) -> Result<Self, Self::Error> {
        Ok(Form {
            questions: serde_json::from_str(&row.questions_json)?,
            id: row.id,
            owner_id: row.owner_id,
            share_id: row.share_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

/// Normalize and serialize the question list. Fails before anything is written.
fn prepare_questions(raw_questions: &Value) -> Result<String, AppError> {
    let questions = question::normalize_questions(raw_questions, NormalizePolicy::LENIENT)?;
    Ok(serde_json::to_string(&questions)?)
}

/// Create a form owned by `owner_id`. Questions go through the lenient normalizer.
pub async fn create(
    pool: &DbPool,
    owner_id: &str,
    title: &str,
    description: &str,
    raw_questions: &Value,
) -> Result<FormIds, AppError> {
    if !user::exists(pool, owner_id).await? {
        return Err(AppError::NotFound("User"));
    }
    let questions_json = prepare_questions(raw_questions)?;

    let ids = FormIds {
        form_id: token::generate_id(),
        share_id: token::generate_share_id(),
    };
    sqlx::query(
        "INSERT INTO forms (id, owner_id, title, description, questions_json, created_at, share_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&ids.form_id)
    .bind(owner_id)
    .bind(title.trim())
    .bind(description.trim())
    .bind(&questions_json)
    .bind(db::now())
    .bind(&ids.share_id)
    .execute(pool)
    .await?;

    log::info!("Form {} created by {owner_id}", ids.form_id);
    Ok(ids)
}

/// Replace title, description and questions wholesale. The share id never changes.
pub async fn update(
    pool: &DbPool,
    form_id: &str,
    owner_id: &str,
    title: &str,
    description: &str,
    raw_questions: &Value,
) -> Result<FormIds, AppError> {
    let existing = find_by_id(pool, form_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    if existing.owner_id != owner_id {
        log::warn!("User {owner_id} tried to update form {form_id} owned by {}", existing.owner_id);
        return Err(AppError::AccessDenied);
    }
    let questions_json = prepare_questions(raw_questions)?;

    sqlx::query(
        "UPDATE forms SET title = ?1, description = ?2, questions_json = ?3 \
         WHERE id = ?4 AND owner_id = ?5",
    )
    .bind(title.trim())
    .bind(description.trim())
    .bind(&questions_json)
    .bind(form_id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(FormIds {
        form_id: existing.id,
        share_id: existing.share_id,
    })
}

pub async fn find_by_id(pool: &DbPool, form_id: &str) -> Result<Option<Form>, AppError> {
    let row = sqlx::query_as::<_, FormRow>(&format!("{SELECT_FORM} WHERE id = ?1"))
        .bind(form_id)
        .fetch_optional(pool)
        .await?;
    row.map(Form::try_from).transpose()
}

pub async fn find_by_share_id(pool: &DbPool, share_id: &str) -> Result<Option<Form>, AppError> {
    let row = sqlx::query_as::<_, FormRow>(&format!("{SELECT_FORM} WHERE share_id = ?1"))
        .bind(share_id)
        .fetch_optional(pool)
        .await?;
    row.map(Form::try_from).transpose()
}

/// All forms of one owner, newest first.
pub async fn list_for_owner(pool: &DbPool, owner_id: &str) -> Result<Vec<Form>, AppError> {
    let rows = sqlx::query_as::<_, FormRow>(&format!(
        "{SELECT_FORM} WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Form::try_from).collect()
}

/// Delete a form and all of its responses in one transaction.
/// Returns whether a form row was removed.
pub async fn delete(pool: &DbPool, form_id: &str) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let responses = sqlx::query("DELETE FROM responses WHERE form_id = ?1")
        .bind(form_id)
        .execute(&mut *tx)
        .await?;
    let forms = sqlx::query("DELETE FROM forms WHERE id = ?1")
        .bind(form_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let removed = forms.rows_affected() > 0;
    if removed {
        log::info!(
            "Form {form_id} deleted with {} responses",
            responses.rows_affected()
        );
    }
    Ok(removed)
}
