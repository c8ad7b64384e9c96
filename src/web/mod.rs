pub mod dashboard;
mod session;
pub mod views;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::client::ActivitiesClient;
use crate::models::Config;
use session::Sessions;

pub(crate) fn router(sessions: Sessions) -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .route("/signup", post(dashboard::signup_handler))
        .route("/actions", post(dashboard::actions_handler))
        .route("/refresh", post(dashboard::refresh_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(sessions)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let client = ActivitiesClient::new(&config.api.base_url)?;
    info!("Using activities service at {}", client.base_url());

    let app = router(Sessions::new(client));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Front end listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
