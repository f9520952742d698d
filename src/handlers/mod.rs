pub mod auth_handlers;
pub mod form_handlers;
pub mod helpers;
pub mod response_handlers;

use actix_web::{error::InternalError, middleware::from_fn, web, HttpResponse};

use crate::auth::middleware::require_json_content_type;
use crate::errors::AppError;
use crate::generator::TextGenerator;

/// Unparseable JSON bodies get the same `{"error": ...}` shape as every
/// other 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {err}");
        let response = actix_web::ResponseError::error_response(&AppError::BadRequest(message));
        InternalError::from_response(err, response).into()
    })
}

/// Mount the JSON API under `/api`. `G` is the text generator stored in
/// app data as `web::Data<Option<G>>`.
pub fn configure<G: TextGenerator + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(from_fn(require_json_content_type))
            .app_data(json_config())
            // Auth
            .route("/auth/register", web::post().to(auth_handlers::register))
            .route("/auth/login", web::post().to(auth_handlers::login))
            .route("/auth/logout", web::post().to(auth_handlers::logout))
            .route("/auth/me", web::get().to(auth_handlers::me))
            .route("/auth/forgot-password", web::post().to(auth_handlers::forgot_password))
            .route("/auth/reset-password", web::post().to(auth_handlers::reset_password))
            // Forms: /forms/generate and /forms/share BEFORE /forms/{id}
            .route("/forms", web::get().to(form_handlers::list))
            .route("/forms", web::post().to(form_handlers::create))
            .route("/forms/generate", web::post().to(form_handlers::generate::<G>))
            .route("/forms/share/{share_id}", web::get().to(form_handlers::read_shared))
            .route("/forms/{id}", web::get().to(form_handlers::read))
            .route("/forms/{id}", web::put().to(form_handlers::update))
            .route("/forms/{id}", web::delete().to(form_handlers::delete))
            // Responses
            .route("/forms/{id}/responses", web::post().to(response_handlers::submit))
            .route("/forms/{id}/responses", web::get().to(response_handlers::list))
            .route("/forms/{id}/response-count", web::get().to(response_handlers::count))
            .route("/forms/{id}/export", web::get().to(response_handlers::export_csv))
            .default_service(web::to(api_not_found)),
    );
}

async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}
