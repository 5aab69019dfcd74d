//! Tally transfer: chunked payload exchange over UDP.
//!
//! A payload travels as an 8-byte big-endian length header followed by
//! frames of up to 1024 payload bytes, each prefixed with an 8-digit
//! sequence number so the receiver can put them back in order.
//!
//! - `protocol`: chunk, number, sort and combine frames
//! - `session`: the two-phase send/receive exchange over a socket
//! - `socket`: listening and connected socket setup
//! - `logging`: structured transfer events

pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod socket;

// Re-export key types for convenience.
pub use error::{CodecError, Result, TransferError};
pub use logging::{NullLogger, TracingLogger, TransferEvent, TransferLog, TransferLogger};
pub use protocol::{
    CHUNK_SIZE, FRAME_MAX, LENGTH_HEADER_SIZE, MAX_SEQUENCE, SEQUENCE_WIDTH, chunk, combine,
    decode_frames, embed_sequence_number, encode_payload, encoded_len, extract_sequence_number,
    sort_by_sequence,
};
pub use session::{
    Datagram, PeerSocket, Received, SendSummary, Session, SessionState, receive_chunks,
    receive_length, send_chunks, send_length,
};
pub use socket::{ListenConfig, bind_listener, connect, resolve};
