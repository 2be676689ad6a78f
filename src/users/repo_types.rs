use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String, // unique, compared exactly as stored
    pub name: String,
    pub image: Option<String>,
    pub hashed_password: Option<String>, // None for OAuth-only accounts
    pub username: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub hashed_password: Option<String>,
    pub username: Option<String>,
}
