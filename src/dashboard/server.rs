//! Read-only HTTP surface for the dashboard.
//!
//! ## Routes
//!
//! - `GET /` - the rendered dashboard page
//! - `GET /api/history` - `{ "rows": [...], "notices": [...], "loaded_at": ... }`
//! - `GET /api/insights` - enriched rows, `null` where a ratio is undefined
//! - `GET /health` - `{ "ok": true }`
//!
//! Every route reads through the shared [`HistoryCache`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::cache::HistoryCache;
use super::insights::derive_insights;
use super::render::render_page;
use crate::config::Settings;
use crate::db::Database;

pub struct DashboardState {
    pub cache: HistoryCache,
    /// Store path as shown on the page
    pub store_label: String,
}

impl DashboardState {
    pub fn new(settings: &Settings) -> Self {
        let db = Database::new(&settings.storage);
        Self {
            cache: HistoryCache::new(
                db,
                Duration::from_secs(settings.dashboard.cache_ttl_secs),
            ),
            store_label: settings.storage.path.clone(),
        }
    }
}

/// Build the dashboard `Router`.
pub fn router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/history", get(history_handler))
        .route("/api/insights", get(insights_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves the dashboard until `cancellation_token` is cancelled.
pub async fn serve(settings: &Settings, cancellation_token: CancellationToken) -> anyhow::Result<()> {
    let state = Arc::new(DashboardState::new(settings));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&settings.dashboard.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.dashboard.bind_addr))?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
        .await
        .context("Dashboard server failed")?;

    info!("Dashboard stopped");
    Ok(())
}

async fn index_handler(State(state): State<Arc<DashboardState>>) -> Html<String> {
    let history = state.cache.get().await;
    let insights = derive_insights(&history.rows);
    Html(render_page(&history, &insights, &state.store_label))
}

async fn history_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    let history = state.cache.get().await;
    Json(history)
}

async fn insights_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    let history = state.cache.get().await;
    Json(derive_insights(&history.rows))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}
