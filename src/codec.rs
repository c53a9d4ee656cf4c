//! waypoint/src/codec.rs
//! Minecraft wire primitives: varints, length-prefixed strings, and framed
//! packets. Everything here operates on in-memory buffers; the async side of
//! reassembly lives in [`crate::framing`].

use crate::error::{ProtocolError, Result};
use serde::Serialize;

/// A varint never spans more than five bytes.
pub const MAX_VARINT_BYTES: usize = 5;

/// Decode limit for a single length-prefixed string (256 KiB), a generous
/// bound for anything the handshake or status flow carries.
pub const MAX_STRING_BYTES: usize = 262_144;

/// Decodes a varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed, or `Ok(None)` when the
/// buffer ends before the varint does (more input may still complete it).
/// A continuation bit on the fifth byte, or fifth-byte value bits past the
/// 32-bit range, fail as [`ProtocolError::MalformedVarInt`].
pub fn decode_varint(buf: &[u8]) -> Result<Option<(i32, usize)>> {
    let mut result: i32 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_BYTES - 1 && (byte & 0xF0) != 0 {
            return Err(ProtocolError::MalformedVarInt);
        }
        result |= ((byte & 0x7F) as i32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((result, i + 1)));
        }
    }
    Ok(None)
}

/// Appends the varint encoding of `value` to `buf`.
pub fn encode_varint(buf: &mut Vec<u8>, mut value: i32) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value = ((value as u32) >> 7) as i32;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            return;
        }
    }
}

/// One framed packet, immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub payload: Vec<u8>,
}

impl Packet {
    /// A cursor over the payload for typed field reads.
    pub fn reader(&self) -> PayloadReader<'_> {
        PayloadReader {
            buf: &self.payload,
            pos: 0,
        }
    }
}

/// Read cursor over a packet payload. Every read past the declared payload
/// length fails as [`ProtocolError::OutOfBounds`].
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_varint(&mut self) -> Result<i32> {
        match decode_varint(&self.buf[self.pos..])? {
            Some((value, consumed)) => {
                self.pos += consumed;
                Ok(value)
            }
            None => Err(ProtocolError::OutOfBounds),
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()?;
        if len < 0 {
            return Err(ProtocolError::OutOfBounds);
        }
        let len = len as usize;
        if len > MAX_STRING_BYTES {
            return Err(ProtocolError::OversizedString(len));
        }
        if len > self.remaining() {
            return Err(ProtocolError::TruncatedString {
                declared: len,
                available: self.remaining(),
            });
        }
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(ProtocolError::OutOfBounds);
        }
        let span = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(span)
    }
}

/// Accumulates typed fields into a packet payload and finalizes it into
/// length-prefixed wire bytes: `varint(len(id + payload)) varint(id) payload`.
pub struct PacketBuilder {
    id: i32,
    payload: Vec<u8>,
}

impl PacketBuilder {
    pub fn new(id: i32) -> Self {
        PacketBuilder {
            id,
            payload: Vec::new(),
        }
    }

    pub fn varint(mut self, value: i32) -> Self {
        encode_varint(&mut self.payload, value);
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        encode_varint(&mut self.payload, s.len() as i32);
        self.payload.extend_from_slice(s.as_bytes());
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.payload.extend_from_slice(bytes);
        self
    }

    /// Serializes `value` and appends it as a length-prefixed JSON string.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self> {
        let text = serde_json::to_string(value)?;
        Ok(self.string(&text))
    }

    pub fn encode(self) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.payload.len() + MAX_VARINT_BYTES);
        encode_varint(&mut body, self.id);
        body.extend_from_slice(&self.payload);

        let mut wire = Vec::with_capacity(body.len() + MAX_VARINT_BYTES);
        encode_varint(&mut wire, body.len() as i32);
        wire.extend(body);
        wire
    }
}
