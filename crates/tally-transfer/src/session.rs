//! Two-phase transfer over a datagram socket.
//!
//! ```text
//! sender:   Idle -> SendingLength -> SendingChunks   -> Done
//! receiver: Idle -> AwaitingLength -> ReceivingChunks -> Done
//! ```
//!
//! Any I/O or decode failure moves the session to `Failed` and is returned
//! to the caller. Nothing is retried.
//!
//! Datagram boundaries are trusted to be frame boundaries. Lost datagrams
//! are not detected: the receiver keeps reading until the declared byte
//! count is reached, so a loss can stall it. Frames are accepted from any
//! address, so two clients talking to one server at once corrupt each
//! other's transfers.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Result, TransferError};
use crate::logging::{NullLogger, TransferEvent, TransferLog, TransferLogger};
use crate::protocol::{
    CHUNK_SIZE, FRAME_MAX, combine, decode_length, encode_length, encode_payload, encoded_len,
    sequence_numbers, sort_by_sequence,
};

/// A socket that moves whole datagrams to and from one peer.
pub trait Datagram {
    fn send_datagram(&self, buf: &[u8]) -> io::Result<usize>;

    fn recv_datagram(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}

/// A connected socket: sends go to the connected peer.
impl Datagram for UdpSocket {
    fn send_datagram(&self, buf: &[u8]) -> io::Result<usize> {
        self.send(buf)
    }

    fn recv_datagram(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.recv_from(buf)
    }
}

impl<D: Datagram + ?Sized> Datagram for &D {
    fn send_datagram(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).send_datagram(buf)
    }

    fn recv_datagram(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        (**self).recv_datagram(buf)
    }
}

/// An unconnected socket paired with the peer it replies to.
pub struct PeerSocket<'a> {
    socket: &'a UdpSocket,
    peer: SocketAddr,
}

impl<'a> PeerSocket<'a> {
    pub fn new(socket: &'a UdpSocket, peer: SocketAddr) -> Self {
        Self { socket, peer }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Datagram for PeerSocket<'_> {
    fn send_datagram(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send_to(buf, self.peer)
    }

    fn recv_datagram(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf)
    }
}

/// Write the length header as a single datagram.
pub fn send_length<D: Datagram + ?Sized>(socket: &D, declared: u64) -> Result<()> {
    socket
        .send_datagram(&encode_length(declared))
        .map_err(TransferError::Write)?;
    Ok(())
}

/// Write each frame as one datagram, in the given order. Frames are
/// expected in sequence order, as `encode_payload` returns them.
pub fn send_chunks<D: Datagram + ?Sized>(
    socket: &D,
    frames: &[Bytes],
    logger: &dyn TransferLogger,
    component: &'static str,
) -> Result<()> {
    for (sequence, frame) in frames.iter().enumerate() {
        socket.send_datagram(frame).map_err(TransferError::Write)?;
        logger.log(TransferLog {
            component,
            event: TransferEvent::FrameSent {
                sequence: sequence as u64,
                size: frame.len(),
            },
        });
    }
    Ok(())
}

/// Read one datagram and decode it as the length header.
/// Returns the declared byte count and the sender's address.
pub fn receive_length<D: Datagram + ?Sized>(
    socket: &D,
    cancel: &CancellationToken,
) -> Result<(u64, SocketAddr)> {
    let mut buf = [0u8; FRAME_MAX];
    let (len, from) = recv_polling(socket, &mut buf, cancel)?;
    Ok((decode_length(&buf[..len])?, from))
}

/// Read datagrams until at least `declared` bytes have arrived.
/// Frames are returned in arrival order.
pub fn receive_chunks<D: Datagram + ?Sized>(
    socket: &D,
    declared: u64,
    cancel: &CancellationToken,
    logger: &dyn TransferLogger,
    component: &'static str,
) -> Result<Vec<Bytes>> {
    let mut buf = vec![0u8; FRAME_MAX];
    let mut frames = Vec::new();
    let mut received: u64 = 0;

    while received < declared {
        let (len, _) = recv_polling(socket, &mut buf, cancel)?;
        received += len as u64;
        frames.push(Bytes::copy_from_slice(&buf[..len]));

        logger.log(TransferLog {
            component,
            event: TransferEvent::FrameReceived {
                size: len,
                received,
                declared,
            },
        });
    }

    Ok(frames)
}

/// Blocking read that retries read timeouts until `cancel` fires.
fn recv_polling<D: Datagram + ?Sized>(
    socket: &D,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<(usize, SocketAddr)> {
    loop {
        match socket.recv_datagram(buf) {
            Ok(received) => return Ok(received),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                if cancel.is_cancelled() {
                    return Err(TransferError::Cancelled);
                }
            }
            Err(e) => return Err(TransferError::Read(e)),
        }
    }
}

/// Where a session is in its exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    SendingLength,
    SendingChunks,
    AwaitingLength,
    ReceivingChunks,
    Done,
    Failed,
}

/// Result of a completed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendSummary {
    pub frames: usize,
    pub declared: u64,
}

/// Result of a completed receive.
#[derive(Debug, Clone)]
pub struct Received {
    pub payload: Vec<u8>,
    pub peer: SocketAddr,
    pub frames: usize,
    pub declared: u64,
}

/// One side of a transfer over a datagram socket.
pub struct Session<D> {
    socket: D,
    component: &'static str,
    state: SessionState,
    logger: Arc<dyn TransferLogger>,
    cancel: CancellationToken,
}

impl<D: Datagram> Session<D> {
    pub fn new(socket: D, component: &'static str) -> Self {
        Self {
            socket,
            component,
            state: SessionState::Idle,
            logger: Arc::new(NullLogger),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn TransferLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Token checked whenever a read times out.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn socket(&self) -> &D {
        &self.socket
    }

    /// Send `payload` as a length header followed by its frames.
    pub fn send(&mut self, payload: &[u8]) -> Result<SendSummary> {
        let result = self.try_send(payload);
        self.finish(result)
    }

    /// Receive one length header and the frame stream it announces.
    pub fn receive(&mut self) -> Result<Received> {
        let result = self.try_receive();
        self.finish(result)
    }

    fn try_send(&mut self, payload: &[u8]) -> Result<SendSummary> {
        let frames = encode_payload(payload, CHUNK_SIZE)?;
        let declared = encoded_len(&frames);

        self.transition(SessionState::SendingLength);
        send_length(&self.socket, declared)?;
        self.log(TransferEvent::LengthSent {
            declared,
            frames: frames.len(),
        });

        self.transition(SessionState::SendingChunks);
        send_chunks(&self.socket, &frames, self.logger.as_ref(), self.component)?;
        self.log(TransferEvent::TransferComplete {
            payload_bytes: payload.len(),
            frames: frames.len(),
        });

        Ok(SendSummary {
            frames: frames.len(),
            declared,
        })
    }

    fn try_receive(&mut self) -> Result<Received> {
        self.transition(SessionState::AwaitingLength);
        let (declared, peer) = receive_length(&self.socket, &self.cancel)?;
        self.log(TransferEvent::LengthReceived {
            declared,
            from: peer,
        });

        self.transition(SessionState::ReceivingChunks);
        let frames = receive_chunks(
            &self.socket,
            declared,
            &self.cancel,
            self.logger.as_ref(),
            self.component,
        )?;

        let count = frames.len();
        let sorted = sort_by_sequence(frames)?;
        self.log(TransferEvent::FramesSorted {
            sequences: sequence_numbers(&sorted),
        });
        let payload = combine(&sorted);
        self.log(TransferEvent::TransferComplete {
            payload_bytes: payload.len(),
            frames: count,
        });

        Ok(Received {
            payload,
            peer,
            frames: count,
            declared,
        })
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.transition(SessionState::Done),
            Err(e) => {
                self.transition(SessionState::Failed);
                self.log(TransferEvent::Error {
                    message: e.to_string(),
                });
            }
        }
        result
    }

    fn transition(&mut self, next: SessionState) {
        debug!(component = self.component, from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    fn log(&self, event: TransferEvent) {
        self.logger.log(TransferLog {
            component: self.component,
            event,
        });
    }
}
