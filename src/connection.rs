//! waypoint/src/connection.rs
//! A socket coupled with its frame reader and protocol state.

use crate::codec::Packet;
use crate::error::{ProtocolError, Result};
use crate::framing::FrameReader;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol state of one side of a connection. `Play` is only ever entered by
/// detaching from packet inspection; nothing is decoded in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Handshake,
    Status,
    Login,
    Play,
}

impl ConnectionState {
    /// The (state, packet id) legality table. Anything outside it is a fatal
    /// protocol error.
    pub fn accepts(self, id: i32) -> bool {
        matches!(
            (self, id),
            (ConnectionState::Handshake, 0x00)
                | (ConnectionState::Status, 0x00)
                | (ConnectionState::Status, 0x01)
                | (ConnectionState::Login, 0x00)
        )
    }

    /// Maps the handshake's declared next-state field. Only 1 (Status) and
    /// 2 (Login) are legal.
    pub fn from_next_state(value: i32) -> Result<Self> {
        match value {
            1 => Ok(ConnectionState::Status),
            2 => Ok(ConnectionState::Login),
            other => Err(ProtocolError::InvalidNextState(other)),
        }
    }
}

/// One peer: the socket, its reassembly buffer, and the current state.
pub struct Connection<S> {
    stream: S,
    frames: FrameReader,
    state: ConnectionState,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S) -> Self {
        Connection {
            stream,
            frames: FrameReader::new(),
            state: ConnectionState::Handshake,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn advance(&mut self, next: ConnectionState) {
        self.state = next;
    }

    /// Reads the next complete packet, suspending until enough bytes arrive.
    /// Returns `Ok(None)` on a clean EOF between frames; EOF mid-frame and
    /// packets illegal in the current state are fatal.
    pub async fn read_packet(&mut self) -> Result<Option<Packet>> {
        loop {
            if let Some(packet) = self.frames.try_next()? {
                if !self.state.accepts(packet.id) {
                    return Err(ProtocolError::UnexpectedPacket {
                        state: self.state,
                        id: packet.id,
                    });
                }
                return Ok(Some(packet));
            }
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                if self.frames.is_empty() {
                    return Ok(None);
                }
                return Err(ProtocolError::UnexpectedEof);
            }
            self.frames.extend(&chunk[..n]);
        }
    }

    /// Writes already-encoded wire bytes to the peer.
    pub async fn send(&mut self, wire: &[u8]) -> Result<()> {
        self.stream.write_all(wire).await?;
        Ok(())
    }

    /// Shuts down the write half. Used after a login disconnect, where the
    /// session closes actively instead of waiting for the peer.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }

    /// Detaches from packet inspection for the relay: returns the raw socket
    /// plus any bytes already buffered past the last decoded packet.
    pub fn into_raw(mut self) -> (S, Vec<u8>) {
        let residual = self.frames.take_residual();
        (self.stream, residual)
    }
}
