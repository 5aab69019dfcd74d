use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tally_server::{ServerConfig, serve};
use tally_transfer::{TracingLogger, TransferLogger, bind_listener};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_server=info,tally_transfer=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let listen = config.listen_config();
    let socket = match bind_listener(&listen) {
        Ok(socket) => socket,
        Err(e) => {
            error!("Failed to listen: {}", e);
            std::process::exit(1);
        }
    };
    info!("Server listening on {}", listen.addr);

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    // Blocking socket I/O stays off the async workers
    let logger: Arc<dyn TransferLogger> = Arc::new(TracingLogger);
    let loop_cancel = cancel.clone();
    let served = tokio::task::spawn_blocking(move || {
        let served = serve::run(&socket, &loop_cancel, logger);
        drop(socket);
        served
    })
    .await;

    match served {
        Ok(count) => {
            info!("Server closed successfully ({} transfers served)", count);
            info!("Exiting");
            Ok(())
        }
        Err(e) => {
            error!("Serve loop failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
    cancel.cancel();
}
