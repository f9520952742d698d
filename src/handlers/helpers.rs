use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::form::{self, Form};

/// Load a form and make sure `owner_id` owns it: 404 when absent, 403 otherwise.
pub async fn owned_form(pool: &DbPool, form_id: &str, owner_id: &str) -> Result<Form, AppError> {
    let found = form::find_by_id(pool, form_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    if found.owner_id != owner_id {
        log::warn!("User {owner_id} denied access to form {form_id}");
        return Err(AppError::AccessDenied);
    }
    Ok(found)
}
