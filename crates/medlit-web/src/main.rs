//! medlit web server
//!
//! Run with: cargo run -p medlit-web

use medlit_common::EntrezCredentials;
use medlit_config::Config;
use medlit_web::state::AppState;
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    info!(bind = %config.server.bind, "Starting medlit server");

    let state = AppState::from_config(&config).await?;

    let seeded = state.mesh_terms.seed_defaults_if_empty().await?;
    if seeded > 0 {
        info!(seeded, "Seeded default MeSH terms");
    }
    let env_credentials = EntrezCredentials::new(
        config.pubmed.email.clone().unwrap_or_default(),
        config.pubmed.api_key.as_ref().map(|k| k.expose_secret()),
    );
    state.credentials.seed_if_empty(&env_credentials).await?;

    let app = medlit_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
