use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Malformed question or answer shape.
    Schema(String),
    /// Malformed response payload.
    Validation(String),
    /// Request the boundary layer rejects before any business logic runs.
    BadRequest(String),
    NotFound(&'static str),
    AccessDenied,
    Unauthorized,
    InvalidCredentials,
    RateLimited,
    /// Generation service unusable: unreachable, timed out, or produced junk.
    Generation(String),
    Db(sqlx::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Hash(String),
    Session(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Schema(e) => write!(f, "Schema error: {e}"),
            AppError::Validation(e) => write!(f, "Validation error: {e}"),
            AppError::BadRequest(e) => write!(f, "Bad request: {e}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::AccessDenied => write!(f, "Access denied"),
            AppError::Unauthorized => write!(f, "Authentication required"),
            AppError::InvalidCredentials => write!(f, "Invalid email or password"),
            AppError::RateLimited => write!(f, "Too many attempts"),
            AppError::Generation(e) => write!(f, "Generation error: {e}"),
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
            AppError::Http(e) => write!(f, "HTTP client error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Message safe to show the caller. Internal detail stays in the log.
    fn public_message(&self) -> String {
        match self {
            AppError::Schema(e) | AppError::Validation(e) | AppError::BadRequest(e) => e.clone(),
            AppError::NotFound(what) => format!("{what} not found"),
            AppError::AccessDenied => "Access denied".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::RateLimited => {
                "Too many failed login attempts. Please try again later.".to_string()
            }
            AppError::Generation(_) => "Failed to generate form".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Schema(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::debug!("{self}");
        }
        HttpResponse::build(status).json(serde_json::json!({ "error": self.public_message() }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_category() {
        assert_eq!(AppError::Schema("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AccessDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Form").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Generation("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn generation_detail_is_not_exposed() {
        let err = AppError::Generation("upstream said: secret stack trace".into());
        assert_eq!(err.public_message(), "Failed to generate form");
    }
}
