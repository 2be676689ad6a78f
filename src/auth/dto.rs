use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of a credentials sign-in attempt. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Server-side view of the signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
}

impl Session {
    pub fn expiring_at(expires: OffsetDateTime) -> Self {
        Self {
            user: SessionUser::default(),
            expires,
        }
    }
}

/// Response returned after sign-in, registration or a session read.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub session: Session,
}

/// Public description of an enabled provider.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub signin_url: String,
    pub callback_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OAuth,
    Credentials,
}
