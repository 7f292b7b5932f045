use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use kb_core::{Result, SessionStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod api;
pub mod datasets;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod session;
pub mod state;

pub use datasets::{load_datasets, LabelDistribution};
pub use state::AppState;

pub const DEFAULT_BIND: &str = "0.0.0.0:8501";

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind: SocketAddr,
    pub data_dir: PathBuf,
    pub session_ttl: Duration,
    /// How often expired sessions are swept
    pub purge_interval: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8501)),
            data_dir: PathBuf::from("data"),
            session_ttl: kb_storage::DEFAULT_SESSION_TTL,
            purge_interval: Duration::from_secs(5 * 60),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::landing))
        .route("/link", get(handlers::link_form).post(handlers::submit_link))
        .route("/content", get(handlers::content_form).post(handlers::submit_content))
        .route("/result", get(handlers::result))
        .route("/health", get(handlers::health))
        .route("/api/scrape", post(api::scrape_article))
        .route("/api/classify", post(api::classify))
        .route("/api/classify/url", post(api::classify_url))
        .route("/api/datasets", get(api::datasets))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Periodically drop expired sessions until the task is aborted.
pub fn spawn_session_purge(
    sessions: Arc<dyn SessionStore>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => info!("🧽 Purged {} expired sessions", purged),
                Err(e) => warn!("Session purge failed: {}", e),
            }
        }
    })
}

pub async fn serve(config: &WebConfig, state: AppState) -> Result<()> {
    let purge = spawn_session_purge(state.sessions.clone(), config.purge_interval);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, create_app(state)).await;
    purge.abort();
    Ok(served?)
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState, WebConfig};
    pub use kb_core::{Error, Result};
}
