use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod handlers;
pub(crate) mod extractors;
pub mod jwt;
pub mod password;
pub mod providers;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
