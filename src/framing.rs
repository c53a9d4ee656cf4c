//! waypoint/src/framing.rs
//! Reassembles complete packets from a stream of byte chunks. One reader per
//! connection; it never exposes a partial frame, and it drains every complete
//! frame already buffered before asking for more input.

use crate::codec::{self, Packet};
use crate::error::{ProtocolError, Result};

/// Declared frame lengths above this (2 MiB) are treated as protocol abuse.
pub const MAX_FRAME_BYTES: usize = 2 * 1024 * 1024;

/// Growable reassembly buffer with a consume-from-the-front cursor.
#[derive(Debug, Default)]
pub struct FrameReader {
    buf: Vec<u8>,
}

impl FrameReader {
    pub fn new() -> Self {
        FrameReader::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Feeds freshly received bytes into the buffer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Extracts the next complete packet, or `Ok(None)` when the buffered
    /// bytes do not yet complete the declared length prefix. An invalid
    /// length prefix or an id varint that overruns its frame is fatal.
    pub fn try_next(&mut self) -> Result<Option<Packet>> {
        let Some((declared, header)) = codec::decode_varint(&self.buf)? else {
            return Ok(None);
        };
        if declared <= 0 || declared as usize > MAX_FRAME_BYTES {
            return Err(ProtocolError::InvalidFrameLength(declared));
        }
        let total = header + declared as usize;
        if self.buf.len() < total {
            return Ok(None);
        }

        let frame = &self.buf[header..total];
        let (id, id_len) = codec::decode_varint(frame)?.ok_or(ProtocolError::MalformedVarInt)?;
        let payload = frame[id_len..].to_vec();
        self.buf.drain(..total);
        Ok(Some(Packet { id, payload }))
    }

    /// Hands back any bytes buffered past the last extracted packet. Used at
    /// relay handoff: pipelined bytes already read off the socket must reach
    /// the backend ahead of the raw copy.
    pub fn take_residual(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}
