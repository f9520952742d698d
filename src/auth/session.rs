use actix_session::Session;

use crate::errors::AppError;

const USER_ID_KEY: &str = "user_id";
const EMAIL_KEY: &str = "email";

pub fn get_user_id(session: &Session) -> Option<String> {
    session.get::<String>(USER_ID_KEY).unwrap_or(None)
}

/// The verified owner id for protected operations; `Unauthorized` when nobody is logged in.
pub fn require_user_id(session: &Session) -> Result<String, AppError> {
    get_user_id(session).ok_or(AppError::Unauthorized)
}

pub fn log_in(session: &Session, user_id: &str, email: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID_KEY, user_id)
        .map_err(|e| AppError::Session(format!("Failed to store user id: {e}")))?;
    session
        .insert(EMAIL_KEY, email)
        .map_err(|e| AppError::Session(format!("Failed to store email: {e}")))?;
    Ok(())
}

pub fn log_out(session: &Session) {
    session.purge();
}
