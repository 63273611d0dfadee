mod middleware;
mod session;
mod web;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::session::SessionStore;
use crate::web::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(clipcast_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let graph = Arc::new(clipcast_graph::GraphClient::new(
        &config.fb_app_id,
        &config.fb_api_secret,
        &config.fb_redirect_uri,
        &config.fb_api_version,
        config.http_timeout_secs,
    )?);
    let tiktok = Arc::new(clipcast_tiktok::TikTokClient::new(
        &config.tiktok_client_key,
        &config.tiktok_client_secret,
        config.http_timeout_secs,
    )?);
    let poll_policy =
        clipcast_publish::PollPolicy::new(config.poll_max_attempts, config.poll_interval_ms);

    let bind_addr = config.bind_addr;
    let app = build_app(AppState {
        config,
        graph,
        tiktok,
        sessions: SessionStore::new(),
        poll_policy,
    });

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "clipcast listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
