use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::api_types::{
    CredentialsRequest, ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
    SuccessResponse, UserResponse,
};
use crate::auth::{password, rate_limit::RateLimiter, session, token};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

/// How long a password reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

fn client_ip(req: &HttpRequest) -> IpAddr {
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// POST /api/auth/register
pub async fn register(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".to_string()));
    }
    if let Some(complaint) = password::check_strength(&body.password) {
        return Err(AppError::BadRequest(complaint));
    }

    let hash = password::hash_password(&body.password).map_err(AppError::Hash)?;
    let id = user::create(&pool, &body.email, &hash).await?;
    let created = user::find_by_id(&pool, &id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    session::log_in(&session, &created.id, &created.email)?;
    log::info!("User registered: {}", created.email);
    Ok(HttpResponse::Created().json(UserResponse { user: created.into() }))
}

/// POST /api/auth/login
pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    limiter: web::Data<RateLimiter>,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check before any database access
    let ip = client_ip(&req);
    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failures");
        return Err(AppError::RateLimited);
    }

    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".to_string()));
    }

    let found = user::find_by_email(&pool, &body.email).await?;
    let verified = match &found {
        Some(u) => password::verify_password(&body.password, &u.password_hash).unwrap_or_else(|e| {
            log::error!("Stored password hash for {} is unreadable: {e}", u.email);
            false
        }),
        None => false,
    };

    match found {
        Some(u) if verified => {
            limiter.clear(ip);
            session::log_in(&session, &u.id, &u.email)?;
            log::info!("Login successful for {}", u.email);
            Ok(HttpResponse::Ok().json(UserResponse { user: u.into() }))
        }
        _ => {
            limiter.record_failure(ip);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> HttpResponse {
    session::log_out(&session);
    HttpResponse::Ok().json(SuccessResponse { success: true })
}

/// GET /api/auth/me
pub async fn me(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = session::require_user_id(&session)?;
    let u = user::find_by_id(&pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(HttpResponse::Ok().json(UserResponse { user: u.into() }))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let reset_token = token::generate_reset_token();
    let expires_at = chrono::Utc::now() + chrono::Duration::hours(RESET_TOKEN_TTL_HOURS);
    if !user::set_reset_token(&pool, &body.email, &reset_token, expires_at).await? {
        return Err(AppError::NotFound("User"));
    }
    log::info!("Password reset requested for {}", body.email.trim());

    let response = if config.reset_token_in_response {
        MessageResponse {
            message: "Use the reset token to choose a new password".to_string(),
            reset_token: Some(reset_token),
        }
    } else {
        MessageResponse {
            message: "Please contact your administrator to reset your password".to_string(),
            reset_token: None,
        }
    };
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    pool: web::Data<DbPool>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let invalid = || AppError::BadRequest("Invalid or expired reset token".to_string());

    let u = user::find_by_reset_token(&pool, body.token.trim(), chrono::Utc::now())
        .await?
        .ok_or_else(invalid)?;
    if let Some(complaint) = password::check_strength(&body.new_password) {
        return Err(AppError::BadRequest(complaint));
    }

    let hash = password::hash_password(&body.new_password).map_err(AppError::Hash)?;
    user::update_password(&pool, &u.id, &hash).await?;
    log::info!("Password updated for {}", u.email);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password updated successfully".to_string(),
        reset_token: None,
    }))
}
