mod instagram;
mod tiktok;
mod views;

use std::sync::Arc;

use axum::{response::Html, routing::get, Router};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use clipcast_core::AppConfig;
use clipcast_graph::GraphClient;
use clipcast_publish::PollPolicy;
use clipcast_tiktok::TikTokClient;

use crate::middleware::request_id;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub graph: Arc<GraphClient>,
    pub tiktok: Arc<TikTokClient>,
    pub sessions: SessionStore,
    pub poll_policy: PollPolicy,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .merge(instagram::router())
        .merge(tiktok::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id))
                .layer(CookieManagerLayer::new()),
        )
        .with_state(state)
}

async fn landing() -> Html<String> {
    views::landing_page(None)
}
