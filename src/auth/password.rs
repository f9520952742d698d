use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Minimum accepted length for a new account or reset password.
pub const MIN_PASSWORD_LEN: usize = 4;

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| e.to_string())
}

/// Check a plaintext password against a stored PHC string.
/// A stored value that is not a valid hash is an error, a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Returns a user-facing complaint, or `None` when the password is acceptable.
pub fn check_strength(password: &str) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some(format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
    None
}
