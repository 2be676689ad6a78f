//! Credential verification and session reconciliation.
//!
//! `authorize` admits or rejects a password sign-in. `derive_token` and
//! `derive_session` run on every refresh cycle and keep the signed token and
//! the session view in line with the stored user record. Neither of the
//! latter two ever fails: when the store cannot answer they keep what the
//! token already carries.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    claims::SessionToken,
    dto::{AuthResponse, CredentialsInput, RegisterRequest, Session, SessionUser},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::{
    error::AuthError,
    users::{NewUser, User, UserStore},
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Verifies a password sign-in and returns the matching user record.
#[instrument(skip(users, credentials), fields(email = ?credentials.email))]
pub async fn authorize(
    users: &dyn UserStore,
    credentials: &CredentialsInput,
) -> Result<User, AuthError> {
    let email = credentials.email.as_deref().filter(|v| !v.is_empty());
    let password = credentials.password.as_deref().filter(|v| !v.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        warn!("sign-in without email or password");
        return Err(AuthError::MissingCredentials);
    };

    let user = users.find_by_email(email).await?;
    let Some((user, hash)) = user.and_then(|u| {
        let hash = u.hashed_password.clone()?;
        Some((u, hash))
    }) else {
        warn!("sign-in for unknown email or account without password");
        return Err(AuthError::UserNotFound);
    };

    if !verify_password(password, &hash)? {
        warn!(user_id = %user.id, "sign-in with wrong password");
        return Err(AuthError::InvalidPassword);
    }

    info!(user_id = %user.id, "credentials accepted");
    Ok(user)
}

/// Reconciles the session token with the record stored under its email.
///
/// A known email rebuilds the token from the record alone. Otherwise the
/// token is kept, with its id stamped from `fresh_user` when a sign-in just
/// happened.
#[instrument(skip_all, fields(email = ?token.email))]
pub async fn derive_token(
    users: &dyn UserStore,
    mut token: SessionToken,
    fresh_user: Option<&User>,
) -> SessionToken {
    let stored = match token.email.as_deref() {
        Some(email) => users.find_by_email(email).await.unwrap_or_else(|e| {
            warn!(error = %e, "token refresh lookup failed; keeping token");
            None
        }),
        None => None,
    };

    match stored {
        Some(user) => SessionToken::from_record(&user),
        None => {
            if let Some(user) = fresh_user {
                token.id = Some(user.id.clone());
            }
            token
        }
    }
}

/// Builds the session view from the token, then overwrites the display
/// fields from a second lookup by id.
///
/// Freshness policy: `image` and the lower-cased `name` always come from the
/// stored record when one exists, since profile edits can land between token
/// refreshes. This costs one extra read per session check.
#[instrument(skip_all, fields(user_id = ?token.id))]
pub async fn derive_session(
    users: &dyn UserStore,
    mut session: Session,
    token: &SessionToken,
) -> Session {
    session.user = SessionUser {
        id: token.id.clone(),
        name: token.name.clone(),
        email: token.email.clone(),
        image: token.picture.clone(),
        username: token.username.clone(),
    };

    let current = match token.id.as_deref() {
        Some(id) => users.find_by_id(id).await.unwrap_or_else(|e| {
            warn!(error = %e, "session freshness lookup failed; using token values");
            None
        }),
        None => None,
    };

    if let Some(user) = current {
        session.user.image = user.image;
        session.user.name = Some(user.name.to_lowercase());
    }
    session
}

/// Mints the signed token and session view for a user who just authenticated.
pub async fn issue_session(
    users: &dyn UserStore,
    keys: &JwtKeys,
    user: &User,
) -> Result<AuthResponse, AuthError> {
    let token = derive_token(users, SessionToken::initial(user), Some(user)).await;
    let (jwt, expires) = keys.sign(&token)?;
    let session = derive_session(users, Session::expiring_at(expires), &token).await;
    Ok(AuthResponse {
        token: jwt,
        session,
    })
}

/// Server-side session accessor: verifies `jwt`, runs a refresh cycle and
/// returns the re-signed token with the reconciled session.
/// `None` when the token is invalid or expired.
pub async fn get_auth_session(
    users: &dyn UserStore,
    keys: &JwtKeys,
    jwt: &str,
) -> Option<AuthResponse> {
    let claims = match keys.verify(jwt) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "invalid or expired session token");
            return None;
        }
    };
    let token = derive_token(users, claims.token, None).await;
    let (jwt, expires) = match keys.sign(&token) {
        Ok(signed) => signed,
        Err(e) => {
            warn!(error = %e, "re-signing session token failed");
            return None;
        }
    };
    let session = derive_session(users, Session::expiring_at(expires), &token).await;
    Some(AuthResponse {
        token: jwt,
        session,
    })
}

/// Creates a password account. The email is trimmed but otherwise stored as given.
#[instrument(skip(users, request), fields(email = %request.email.trim()))]
pub async fn register(users: &dyn UserStore, request: RegisterRequest) -> Result<User, AuthError> {
    let email = request.email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(AuthError::Validation("Invalid email".into()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation("Password too short".into()));
    }
    if users.find_by_email(&email).await?.is_some() {
        return Err(email_taken());
    }

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    let user = users
        .create(NewUser {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            image: None,
            hashed_password: Some(hash_password(&request.password)?),
            username: None,
        })
        .await?
        .ok_or_else(email_taken)?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

fn email_taken() -> AuthError {
    warn!("email already registered");
    AuthError::Conflict("Email already registered".into())
}
