use std::net::SocketAddr;

use anyhow::Context;
use frontdesk_mock_backend::{router, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frontdesk_otel::init();

    let addr = bind_addr(std::env::var("FRONTDESK_MOCK_BIND").ok().as_deref());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding mock backend on {addr}"))?;
    tracing::info!("mock backend listening on {}", addr);
    axum::serve(listener, router(Store::default()))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("mock backend server")?;
    Ok(())
}

fn bind_addr(raw: Option<&str>) -> SocketAddr {
    let fallback = SocketAddr::from(([127, 0, 0, 1], 8000));
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.parse() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::warn!(value = raw, %err, "invalid FRONTDESK_MOCK_BIND; using {fallback}");
            fallback
        }
    }
}
