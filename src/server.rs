use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, serve};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Serves `router` until SIGINT/SIGTERM, then gives in-flight requests up to
/// `grace` to finish.
pub async fn run(router: Router, addr: SocketAddr, grace: Duration) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "starting server");

    let shutdown_started = Arc::new(Notify::new());
    let notifier = Arc::clone(&shutdown_started);

    let server = serve(listener, router).with_graceful_shutdown(async move {
        let signal = shutdown_signal().await;
        tracing::info!(signal, "shutting down server");
        notifier.notify_one();
    })
    .into_future();

    let deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result?,
        () = deadline => {
            tracing::warn!(grace_secs = grace.as_secs(), "graceful shutdown timed out");
        }
    }

    tracing::info!(%addr, "stopped server");
    Ok(())
}

async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
