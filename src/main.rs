use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use reco_api::api::{create_router, AppState};
use reco_api::config::Config;
use reco_api::storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // One-shot model load. On failure the process keeps serving so that
    // /health stays reachable, but every recommendation request fails fast
    // until a restart.
    let state = match storage::load_model(&config.model_blob_url).await {
        Ok(model) => {
            tracing::info!(
                users = model.num_users(),
                items = model.num_items(),
                "Loaded SVD model from blob storage"
            );
            AppState::with_model(Arc::new(model))
        }
        Err(e) => {
            tracing::error!(error = %e, "Model load failed; recommendations unavailable until restart");
            AppState::unavailable()
        }
    }
    .with_function_key(config.function_key.clone());

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Recommendation service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
