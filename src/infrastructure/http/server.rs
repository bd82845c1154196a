use super::routes::router;
use crate::TradeLedger;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bind and serve until Ctrl-C.
pub async fn serve(ledger: Arc<TradeLedger>, host: &str, port: u16) -> std::io::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, backend = ledger.backend(), "trade ledger listening");

    axum::serve(listener, router(ledger))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
