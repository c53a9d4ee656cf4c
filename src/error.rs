//! waypoint/src/error.rs
//! Wire-level error taxonomy.

use crate::connection::ConnectionState;
use std::io;
use thiserror::Error;

/// Fatal protocol failures. Any of these closes the connection without a
/// reply; a peer that cannot frame a packet cannot be trusted to parse one.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed varint (continuation past 5 bytes or value beyond 32 bits)")]
    MalformedVarInt,

    #[error("string declares {declared} bytes but only {available} are present")]
    TruncatedString { declared: usize, available: usize },

    #[error("string of {0} bytes exceeds the decode limit")]
    OversizedString(usize),

    #[error("string is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("read past the end of the packet payload")]
    OutOfBounds,

    #[error("frame length {0} outside the accepted range")]
    InvalidFrameLength(i32),

    #[error("unexpected packet id {id:#04x} in {state:?} state")]
    UnexpectedPacket { state: ConnectionState, id: i32 },

    #[error("handshake declared illegal next state {0}")]
    InvalidNextState(i32),

    #[error("peer closed the connection mid-frame")]
    UnexpectedEof,

    #[error("JSON payload serialization failed")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
