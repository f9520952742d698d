use actix_session::Session;
use actix_web::{HttpResponse, http::header, web};

use crate::api_types::{CountResponse, SubmitRequest, SubmitResponse};
use crate::auth::session::require_user_id;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{export, response};
use super::helpers::owned_form;

/// POST /api/forms/{id}/responses - public submission
pub async fn submit(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
    body: web::Json<SubmitRequest>,
) -> Result<HttpResponse, AppError> {
    let form_id = path.into_inner();
    let response_id = response::submit(
        &pool,
        &form_id,
        &body.responses,
        config.enforce_required_answers,
    )
    .await?;

    Ok(HttpResponse::Created().json(SubmitResponse { success: true, response_id }))
}

/// GET /api/forms/{id}/responses
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;
    let found = owned_form(&pool, &path.into_inner(), &owner_id).await?;

    let responses = response::list(&pool, &found.id).await?;
    Ok(HttpResponse::Ok().json(responses))
}

/// GET /api/forms/{id}/response-count
pub async fn count(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;
    let found = owned_form(&pool, &path.into_inner(), &owner_id).await?;

    let count = response::count(&pool, &found.id).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// GET /api/forms/{id}/export - CSV download of every response
pub async fn export_csv(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = require_user_id(&session)?;
    let found = owned_form(&pool, &path.into_inner(), &owner_id).await?;

    let responses = response::list(&pool, &found.id).await?;
    let csv = export::to_csv(&found, &responses);
    log::info!("Exported {} responses for form {}", responses.len(), found.id);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export::file_name(&found)),
        ))
        .body(csv))
}
