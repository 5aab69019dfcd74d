//! Error types for chunked transfers.
//!
//! Every socket or codec failure becomes a `TransferError` that the caller
//! can branch on. Nothing in this crate prints or exits.

use std::io;

use thiserror::Error;

/// Failure of a single send or receive exchange.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The target address could not be resolved.
    #[error("cannot resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The local socket could not be created, configured or bound.
    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// A datagram write failed.
    #[error("write error: {0}")]
    Write(#[source] io::Error),

    /// A datagram read failed.
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    /// The length header datagram was not exactly 8 bytes.
    #[error("length header must be 8 bytes, got {received}")]
    LengthHeader { received: usize },

    /// A received frame could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Shutdown was requested while waiting for a datagram.
    #[error("transfer cancelled")]
    Cancelled,
}

/// Wire frame encoding and decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Frame is too short to carry a sequence header.
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Sequence header contains something other than ASCII digits.
    #[error("invalid sequence header {header:?}")]
    InvalidSequence { header: String },

    /// Chunking with a zero chunk size.
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
}

pub type Result<T> = std::result::Result<T, TransferError>;
