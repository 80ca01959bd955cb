//! vouchervote-server/src/server.rs
//!
//! Serves the HTTP API until Ctrl-C, and the one-shot voucher load.

use std::time::Duration;

use axum_server::{Handle, Server};
use tracing::{error, info};
use vouchervote_core::http::{cors_layer, router};
use vouchervote_core::Error;

use crate::config::ServerConfig;
use crate::context::ServerContext;

pub async fn run_server(config: ServerConfig) -> Result<(), Error> {
    let ctx = ServerContext::new(&config).await?;

    let cors = cors_layer(config.cors_origins.as_slice())?;
    let app = router(ctx.voting.clone(), cors);

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
            return;
        }
        info!("Ctrl-C detected; shutting down HTTP server...");
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    info!("Voting API listening on http://{}", config.server_addr);
    Server::bind(config.server_addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    ctx.db.pool().close().await;
    info!("HTTP server shut down.");
    Ok(())
}

pub async fn run_voucher_load(config: ServerConfig) -> Result<(), Error> {
    let (Some(path), Some(expiry)) = (config.voucher_file.as_deref(), config.expires_at) else {
        return Err(Error::Config("load-vouchers mode needs a voucher file and an expiry".into()));
    };

    let ctx = ServerContext::new(&config).await?;
    let summary = ctx.loader.load_file(path, expiry).await?;
    info!(
        "Loaded vouchers from {}: {} inserted, {} already present",
        path.display(),
        summary.inserted,
        summary.skipped
    );

    ctx.db.pool().close().await;
    Ok(())
}
