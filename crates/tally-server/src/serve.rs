//! Sequential receive / count / reply loop.
//!
//! One transfer is handled at a time. There is no per-client state, so a
//! second client sending while a transfer is in flight corrupts both.

use std::net::UdpSocket;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use tally_transfer::{PeerSocket, Session, TransferError, TransferLogger};

use crate::report::Report;

const COMPONENT: &str = "server";

/// Receive one payload, compute its report and send the report back to the
/// address the length header came from.
pub fn handle_one(
    socket: &UdpSocket,
    cancel: &CancellationToken,
    logger: &Arc<dyn TransferLogger>,
) -> Result<Report, TransferError> {
    let mut inbound = Session::new(socket, COMPONENT)
        .with_logger(logger.clone())
        .with_cancellation(cancel.clone());
    let received = inbound.receive()?;

    let report = Report::from_payload(&received.payload);
    let response = report.to_string();
    info!(
        peer = %received.peer,
        words = report.words,
        chars = report.chars,
        "report generated\n{}",
        response
    );

    let mut reply = Session::new(PeerSocket::new(socket, received.peer), COMPONENT)
        .with_logger(logger.clone());
    reply.send(response.as_bytes())?;

    Ok(report)
}

/// Serve transfers until `cancel` fires. A failed transfer is logged and
/// the loop waits for the next one. Returns the number of transfers served.
pub fn run(socket: &UdpSocket, cancel: &CancellationToken, logger: Arc<dyn TransferLogger>) -> u64 {
    let mut served: u64 = 0;

    while !cancel.is_cancelled() {
        match handle_one(socket, cancel, &logger) {
            Ok(_) => served += 1,
            Err(TransferError::Cancelled) => break,
            Err(e) => warn!("Transfer aborted: {}", e),
        }
    }

    info!(served, "Serve loop stopped");
    served
}
