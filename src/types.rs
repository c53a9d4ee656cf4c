//! waypoint/src/types.rs
//! Wire message types: the handshake and the JSON bodies of status and
//! disconnect packets.

use crate::codec::{Packet, PacketBuilder};
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const HANDSHAKE: i32 = 0x00;
pub const STATUS_REQUEST: i32 = 0x00;
pub const STATUS_RESPONSE: i32 = 0x00;
pub const PING: i32 = 0x01;
pub const PONG: i32 = 0x01;
pub const LOGIN_DISCONNECT: i32 = 0x00;

/// The first packet of every session. `server_port` is informational only;
/// routing keys off `server_address`.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: i32,
}

impl Handshake {
    pub fn decode(packet: &Packet) -> Result<Self> {
        let mut reader = packet.reader();
        Ok(Handshake {
            protocol_version: reader.read_varint()?,
            server_address: reader.read_string()?,
            server_port: reader.read_u16()?,
            next_state: reader.read_varint()?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        PacketBuilder::new(HANDSHAKE)
            .varint(self.protocol_version)
            .string(&self.server_address)
            .u16(self.server_port)
            .varint(self.next_state)
            .encode()
    }
}

/// A chat component, used for both the status description and the login
/// disconnect reason.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub version: StatusVersion,
    pub players: StatusPlayers,
    pub description: ChatMessage,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusVersion {
    pub name: String,
    pub protocol: i32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusPlayers {
    pub max: i32,
    pub online: i32,
}

impl StatusResponse {
    /// The synthetic status shown for hostnames with no route: placeholder
    /// version and player counts around the rejection message.
    pub fn placeholder(description: ChatMessage) -> Self {
        StatusResponse {
            version: StatusVersion {
                name: "Proxy".to_string(),
                protocol: -1,
            },
            players: StatusPlayers {
                max: -1,
                online: -1,
            },
            description,
        }
    }
}
