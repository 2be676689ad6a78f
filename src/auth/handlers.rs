use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{AuthResponse, CredentialsInput, ProviderInfo, RegisterRequest},
    extractors::BearerToken,
    jwt::JwtKeys,
    providers::enabled_providers,
    services,
};
use crate::{error::AuthError, state::AppState};

pub const AUTH_BASE_PATH: &str = "/api/auth";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/callback/credentials", post(sign_in_credentials))
        .route("/auth/register", post(register))
        .route("/auth/session", get(session))
        .route("/auth/providers", get(providers))
}

/// Failed credentials sign-in, pointing the client at the error page.
pub struct SignInRejection {
    error: AuthError,
    error_page: String,
}

impl IntoResponse for SignInRejection {
    fn into_response(self) -> Response {
        if !self.error.is_credentials_failure() {
            return self.error.into_response();
        }
        let code = self.error.code();
        let body = Json(serde_json::json!({
            "error": code,
            "message": self.error.to_string(),
            "url": format!("{}?error={}", self.error_page, code),
        }));
        (self.error.status(), body).into_response()
    }
}

#[instrument(skip(state, input))]
pub async fn sign_in_credentials(
    State(state): State<AppState>,
    Json(input): Json<CredentialsInput>,
) -> Result<Json<AuthResponse>, SignInRejection> {
    let reject = |error: AuthError| SignInRejection {
        error,
        error_page: state.config.pages.error.clone(),
    };

    let user = services::authorize(state.users.as_ref(), &input)
        .await
        .map_err(reject)?;
    let keys = JwtKeys::from_ref(&state);
    let response = services::issue_session(state.users.as_ref(), &keys, &user)
        .await
        .map_err(reject)?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let user = services::register(state.users.as_ref(), payload).await?;
    let keys = JwtKeys::from_ref(&state);
    let response = services::issue_session(state.users.as_ref(), &keys, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip_all)]
pub async fn session(
    State(state): State<AppState>,
    BearerToken(jwt): BearerToken,
) -> Result<Json<AuthResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    services::get_auth_session(state.users.as_ref(), &keys, &jwt)
        .await
        .map(Json)
        .ok_or(AuthError::Unauthorized)
}

pub async fn providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    Json(enabled_providers(&state.config.providers, AUTH_BASE_PATH))
}
