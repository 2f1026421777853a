use dns_sidecar_api::{create_api_routes, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::SidecarError;

/// Binds before any job starts so a busy port fails the process early.
pub async fn bind_web_listener(addr: SocketAddr) -> Result<TcpListener, SidecarError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| SidecarError::Bind { addr, source })
}

/// Serves until `shutdown` fires, then drains open connections.
pub async fn start_web_server(
    listener: TcpListener,
    state: AppState,
    metrics_path: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    info!(
        bind_address = %local_addr,
        metrics_url = format!("http://{}{}", local_addr, metrics_path),
        "Starting scrape endpoint"
    );

    let app = create_api_routes(state, metrics_path);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Scrape endpoint stopped");
    Ok(())
}
