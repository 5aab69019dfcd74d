//! One request/response cycle with the server.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use tally_transfer::{Session, TransferLogger, connect, resolve};

use crate::config::ClientConfig;
use crate::error::ClientError;

const COMPONENT: &str = "client";

/// Send `payload` to `target` and wait for the reply. A fresh socket is
/// opened for the exchange and closed when it returns.
pub fn exchange(
    target: &str,
    payload: &[u8],
    logger: Arc<dyn TransferLogger>,
) -> Result<String, ClientError> {
    let addr = resolve(target)?;
    let socket = connect(addr)?;

    let mut session = Session::new(socket, COMPONENT).with_logger(logger);
    let sent = session.send(payload)?;
    info!(target = %addr, frames = sent.frames, declared = sent.declared, "payload sent");

    let received = session.receive()?;
    Ok(String::from_utf8_lossy(&received.payload).into_owned())
}

/// Read the file at `path` and exchange its contents with the server.
/// Empty files are rejected before any socket is opened.
pub fn send_file(
    config: &ClientConfig,
    path: &Path,
    logger: Arc<dyn TransferLogger>,
) -> Result<String, ClientError> {
    let content = fs::read(path).map_err(|source| ClientError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Err(ClientError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    exchange(&config.target_address(), &content, logger)
}
