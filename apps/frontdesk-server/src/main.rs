mod api;
mod app_state;
mod config;
mod responses;
mod router;
#[cfg(test)]
mod test_support;
mod upstream;

use anyhow::Context;
use tracing::info;

use crate::{app_state::AppState, config::ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frontdesk_otel::init();

    let config = ProxyConfig::from_env();
    let state = AppState::new(&config)?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding proxy on {}", config.bind))?;
    info!(
        bind = %config.bind,
        backend = %config.backend_url,
        "frontdesk proxy listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("proxy server exited")?;
    info!("proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(%err, "SIGTERM handler unavailable; waiting for ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}
