//! hitcount server
//!
//! Counts hits per referrer:
//! - `POST /count` with `{"referer": "<url>"}`
//! - `GET /count` with a `Referer` header (deprecated)
//! - `GET /` welcome message

use tracing_subscriber::{fmt, EnvFilter};

use hitcount_core::error::Result;
use hitcount_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "hitcount-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let (cfg, source) = config::load_default()?;
    tracing::info!(%source, backend = cfg.storage.backend.as_str(), "config loaded");

    let state = AppState::connect(cfg).await?;
    let listen = state.cfg().server.listen_addr()?;

    let existing = state.counter().snapshot().await?;
    tracing::info!(counters = existing.len(), "existing counters");
    for rec in &existing {
        tracing::debug!(id = %rec.id, referrer = %rec.referrer, count = rec.count, "counter");
    }

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| hitcount_core::HitCountError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!("listening on http://{listen}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| hitcount_core::HitCountError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
