//! Structured transfer events.
//!
//! Sessions report what they put on or take off the wire through a
//! `TransferLogger`, so binaries can route them to `tracing` and tests can
//! discard them.

use std::fmt;
use std::net::SocketAddr;

/// Structured log entry for one transfer step.
#[derive(Debug, Clone)]
pub struct TransferLog {
    pub component: &'static str,
    pub event: TransferEvent,
}

/// Transfer events that can be logged.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// Sender: length header written
    LengthSent { declared: u64, frames: usize },
    /// Sender: one frame written
    FrameSent { sequence: u64, size: usize },
    /// Receiver: length header accepted
    LengthReceived { declared: u64, from: SocketAddr },
    /// Receiver: one frame read
    FrameReceived {
        size: usize,
        received: u64,
        declared: u64,
    },
    /// Receiver: frames put back in order
    FramesSorted { sequences: Vec<u64> },
    /// Either side: both phases finished
    TransferComplete { payload_bytes: usize, frames: usize },
    /// Error occurred
    Error { message: String },
}

impl fmt::Display for TransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthSent { declared, frames } => {
                write!(f, "length_sent declared={} frames={}", declared, frames)
            }
            Self::FrameSent { sequence, size } => {
                write!(f, "frame_sent seq={:08} size={}", sequence, size)
            }
            Self::LengthReceived { declared, from } => {
                write!(f, "length_received declared={} from={}", declared, from)
            }
            Self::FrameReceived { size, received, declared } => {
                write!(f, "frame_received size={} progress={}/{}", size, received, declared)
            }
            Self::FramesSorted { sequences } => {
                write!(f, "frames_sorted count={} seq=[", sequences.len())?;
                for (i, sequence) in sequences.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:08}", sequence)?;
                }
                f.write_str("]")
            }
            Self::TransferComplete { payload_bytes, frames } => {
                write!(f, "transfer_complete bytes={} frames={}", payload_bytes, frames)
            }
            Self::Error { message } => {
                write!(f, "error: {}", message)
            }
        }
    }
}

/// Sink for transfer events.
pub trait TransferLogger: Send + Sync {
    fn log(&self, entry: TransferLog);
}

/// Logger that uses the `tracing` crate.
pub struct TracingLogger;

impl TransferLogger for TracingLogger {
    fn log(&self, entry: TransferLog) {
        // Per-frame events are debug, everything else info
        match &entry.event {
            TransferEvent::FrameSent { .. }
            | TransferEvent::FrameReceived { .. }
            | TransferEvent::FramesSorted { .. } => {
                tracing::debug!(component = entry.component, "{}", entry.event);
            }
            TransferEvent::Error { .. } => {
                tracing::warn!(component = entry.component, "{}", entry.event);
            }
            _ => {
                tracing::info!(component = entry.component, "{}", entry.event);
            }
        }
    }
}

/// No-op logger that discards all log entries.
pub struct NullLogger;

impl TransferLogger for NullLogger {
    fn log(&self, _entry: TransferLog) {}
}
