use serde::{Deserialize, Serialize};

use crate::users::User;

/// Identity claims carried by the session token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>, // user image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SessionToken {
    /// Token minted at sign-in, before reconciliation assigns an id.
    pub fn initial(user: &User) -> Self {
        Self {
            id: None,
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            picture: user.image.clone(),
            username: None,
        }
    }

    /// Token rebuilt from the authoritative record.
    pub fn from_record(user: &User) -> Self {
        Self {
            id: Some(user.id.clone()),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            picture: user.image.clone(),
            username: None,
        }
    }
}

/// JWT payload: identity claims plus the registered claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub token: SessionToken,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}
