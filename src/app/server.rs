use crate::error::PoetryError;
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve `app` on `bind_addr` until SIGINT/SIGTERM or `shutdown_token`
/// is cancelled.
pub async fn serve(
    app: Router,
    bind_addr: SocketAddr,
    shutdown_token: CancellationToken,
) -> Result<(), PoetryError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| PoetryError::Bind {
            address: bind_addr.to_string(),
            source: e,
        })?;
    info!("Server listening on {}", listener.local_addr()?);
    info!("  - GET  /v1/health             (health check)");
    info!("  - GET  /v1/pollution/summary  (average pollution for a date range)");
    info!("  - POST /v1/poems              (generate a poem)");
    info!("  - GET  /v1/poems/latest       (poem shown for a session)");
    info!("  - POST /v1/translate          (translate a poem)");

    let server_shutdown = shutdown_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                () = shutdown_signal() => server_shutdown.cancel(),
                () = server_shutdown.cancelled() => {}
            }
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
