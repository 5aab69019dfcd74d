//! Wire format for chunked transfers.
//!
//! Every transfer, in either direction, is one length header followed by a
//! stream of frames:
//!
//! ```text
//! Length header (one datagram):
//!   [0..8]   Total encoded bytes to follow (u64 BE)
//!
//! Frame (one datagram each):
//!   [0..8]   Sequence number, zero-padded ASCII decimal ("00000042")
//!   [8..]    Payload slice (up to 1024 bytes)
//! ```
//!
//! The declared length counts sequence headers too: a 2500-byte payload
//! becomes frames of 1032 + 1032 + 460 bytes and a header of 2524.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::error::{CodecError, TransferError};

/// Maximum payload bytes per frame.
pub const CHUNK_SIZE: usize = 1024;

/// Width of the decimal sequence header.
pub const SEQUENCE_WIDTH: usize = 8;

/// Largest frame on the wire (header + payload).
pub const FRAME_MAX: usize = CHUNK_SIZE + SEQUENCE_WIDTH;

/// Size of the length header datagram.
pub const LENGTH_HEADER_SIZE: usize = 8;

/// Largest sequence number that fits the 8-digit header.
pub const MAX_SEQUENCE: u64 = 99_999_999;

const SEQUENCE_MODULUS: u64 = MAX_SEQUENCE + 1;

/// Split `payload` into slices of `chunk_size` bytes. The last slice holds
/// the remainder. An empty payload yields no chunks.
pub fn chunk(payload: &[u8], chunk_size: usize) -> Result<Vec<&[u8]>, CodecError> {
    if chunk_size == 0 {
        return Err(CodecError::ZeroChunkSize);
    }
    Ok(payload.chunks(chunk_size).collect())
}

/// Prefix `chunk` with its zero-padded 8-digit sequence number.
///
/// Indices above [`MAX_SEQUENCE`] do not fit the header. They keep their low
/// eight digits, so frame 100_000_000 collides with frame 0 on the receiver.
/// The header width is part of the wire format and stays fixed.
pub fn embed_sequence_number(chunk: &[u8], index: u64) -> Bytes {
    if index > MAX_SEQUENCE {
        warn!(index, max = MAX_SEQUENCE, "sequence number overflows the 8-digit header");
    }

    let mut frame = BytesMut::with_capacity(SEQUENCE_WIDTH + chunk.len());
    frame.put_slice(format!("{:08}", index % SEQUENCE_MODULUS).as_bytes());
    frame.put_slice(chunk);
    frame.freeze()
}

/// Parse the sequence header of a frame.
pub fn extract_sequence_number(frame: &[u8]) -> Result<u64, CodecError> {
    if frame.len() < SEQUENCE_WIDTH {
        return Err(CodecError::FrameTooShort {
            required: SEQUENCE_WIDTH,
            actual: frame.len(),
        });
    }

    let header = &frame[..SEQUENCE_WIDTH];
    if !header.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::InvalidSequence {
            header: String::from_utf8_lossy(header).into_owned(),
        });
    }

    Ok(header
        .iter()
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0')))
}

/// Stable sort of frames by sequence number. Duplicates and gaps pass
/// through untouched.
pub fn sort_by_sequence(frames: Vec<Bytes>) -> Result<Vec<Bytes>, CodecError> {
    let mut keyed = frames
        .into_iter()
        .map(|frame| Ok((extract_sequence_number(&frame)?, frame)))
        .collect::<Result<Vec<_>, CodecError>>()?;

    keyed.sort_by_key(|(sequence, _)| *sequence);
    Ok(keyed.into_iter().map(|(_, frame)| frame).collect())
}

/// Concatenate the payload of each frame, in the given order.
pub fn combine(sorted: &[Bytes]) -> Vec<u8> {
    let total = sorted
        .iter()
        .map(|frame| frame.len().saturating_sub(SEQUENCE_WIDTH))
        .sum();

    let mut payload = Vec::with_capacity(total);
    for frame in sorted {
        payload.extend_from_slice(frame.get(SEQUENCE_WIDTH..).unwrap_or_default());
    }
    payload
}

/// Chunk and number a payload. Returns frames in send order.
pub fn encode_payload(payload: &[u8], chunk_size: usize) -> Result<Vec<Bytes>, CodecError> {
    Ok(chunk(payload, chunk_size)?
        .into_iter()
        .enumerate()
        .map(|(index, slice)| embed_sequence_number(slice, index as u64))
        .collect())
}

/// Value of the length header for a frame stream.
pub fn encoded_len(frames: &[Bytes]) -> u64 {
    frames.iter().map(|frame| frame.len() as u64).sum()
}

/// Reorder frames received in any order and rebuild the payload.
pub fn decode_frames(frames: Vec<Bytes>) -> Result<Vec<u8>, CodecError> {
    Ok(combine(&sort_by_sequence(frames)?))
}

/// Sequence numbers of already-validated frames, for logging.
pub fn sequence_numbers(frames: &[Bytes]) -> Vec<u64> {
    frames
        .iter()
        .filter_map(|frame| extract_sequence_number(frame).ok())
        .collect()
}

pub fn encode_length(len: u64) -> [u8; LENGTH_HEADER_SIZE] {
    len.to_be_bytes()
}

/// Decode a length header datagram. Anything but exactly 8 bytes is rejected.
pub fn decode_length(datagram: &[u8]) -> Result<u64, TransferError> {
    let header: [u8; LENGTH_HEADER_SIZE] =
        datagram
            .try_into()
            .map_err(|_| TransferError::LengthHeader {
                received: datagram.len(),
            })?;
    Ok(u64::from_be_bytes(header))
}
