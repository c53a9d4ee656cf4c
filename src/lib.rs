//! waypoint/src/lib.rs
//! Hostname-routing reverse proxy for the Minecraft handshake protocol.
//!
//! One public port fronts many virtual backends: each session's handshake
//! declares a hostname, the router maps it to a backend address, and the
//! session either replays the handshake toward that backend and degrades into
//! a raw byte relay, or answers with a synthetic status/disconnect when no
//! route exists.

pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod framing;
pub mod logging;
pub mod relay;
pub mod router;
pub mod server;
pub mod session;
pub mod types;

pub use codec::{Packet, PacketBuilder, PayloadReader};
pub use config::ProxyConfig;
pub use connection::{Connection, ConnectionState};
pub use error::ProtocolError;
pub use framing::FrameReader;
pub use router::{Route, Router};
pub use server::serve;
pub use session::Outcome;
pub use types::Handshake;
