mod app;
mod auth;
mod config;
mod error;
mod state;
mod users;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let state = state::AppState::init().await?;
    let enabled: Vec<_> = auth::providers::enabled_providers(
        &state.config.providers,
        auth::handlers::AUTH_BASE_PATH,
    )
    .into_iter()
    .map(|p| p.id)
    .collect();
    tracing::info!(providers = ?enabled, "auth providers enabled");

    app::serve(app::build_app(state)).await
}

/// `RUST_LOG` filter with a service default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("authgate=debug,tower_http=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}
