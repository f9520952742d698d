use serde::Serialize;

/// Internal user row for authentication, includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Safe projection for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserDisplay {
    pub id: String,
    pub email: String,
}

impl From<User> for UserDisplay {
    fn from(u: User) -> Self {
        UserDisplay { id: u.id, email: u.email }
    }
}
