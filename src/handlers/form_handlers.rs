use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api_types::{
    FormIdsResponse, FormListItem, FormRequest, GenerateRequest, GenerateResponse, PublicForm,
    SuccessResponse,
};
use crate::auth::session::require_user_id;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::generator::{self, TextGenerator};
use crate::models::{form, response};
use super::helpers::owned_form;

/// GET /api/forms - the caller's forms, newest first, with response counts
pub async fn list(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;

    let forms = form::list_for_owner(&pool, &owner_id).await?;
    let mut items = Vec::with_capacity(forms.len());
    for f in forms {
        let response_count = response::count(&pool, &f.id).await?;
        items.push(FormListItem { form: f, response_count });
    }

    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/forms
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<FormRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;

    let ids = form::create(
        &pool,
        &owner_id,
        body.title.as_deref().unwrap_or(""),
        body.description.as_deref().unwrap_or(""),
        &body.questions,
    )
    .await?;

    Ok(HttpResponse::Created().json(FormIdsResponse { success: true, ids }))
}

/// POST /api/forms/generate - draft a form from a topic and save it
pub async fn generate<G: TextGenerator + 'static>(
    pool: web::Data<DbPool>,
    session: Session,
    config: web::Data<AppConfig>,
    text_generator: web::Data<Option<G>>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;

    let Some(text_generator) = text_generator.get_ref().as_ref() else {
        return Err(AppError::BadRequest(
            "Form generation is not configured on this server".to_string(),
        ));
    };
    let topic = body.prompt.as_deref().map(str::trim).unwrap_or("");
    if topic.is_empty() {
        return Err(AppError::BadRequest("Prompt is required".to_string()));
    }

    log::info!("Generating form for {owner_id}");
    let draft = tokio::time::timeout(
        config.generation_timeout,
        generator::generate_draft(text_generator, topic),
    )
    .await
    .map_err(|_| {
        AppError::Generation(format!("generation timed out after {:?}", config.generation_timeout))
    })??;

    let ids = form::create(
        &pool,
        &owner_id,
        &draft.title,
        &draft.description,
        &draft.questions_value()?,
    )
    .await?;

    Ok(HttpResponse::Created().json(GenerateResponse { success: true, ids, form: draft }))
}

/// GET /api/forms/share/{share_id} - public, no session needed
pub async fn read_shared(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let share_id = path.into_inner();
    let found = form::find_by_share_id(&pool, &share_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    Ok(HttpResponse::Ok().json(PublicForm::from(found)))
}

/// GET /api/forms/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;
    let found = owned_form(&pool, &path.into_inner(), &owner_id).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// PUT /api/forms/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<FormRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;

    let ids = form::update(
        &pool,
        &path.into_inner(),
        &owner_id,
        body.title.as_deref().unwrap_or(""),
        body.description.as_deref().unwrap_or(""),
        &body.questions,
    )
    .await?;

    Ok(HttpResponse::Ok().json(FormIdsResponse { success: true, ids }))
}

/// DELETE /api/forms/{id} - removes the form and every response to it
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;
    let found = owned_form(&pool, &path.into_inner(), &owner_id).await?;

    let removed = form::delete(&pool, &found.id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: removed }))
}
