//! waypoint/src/session.rs
//! Per-connection orchestration: handshake, routing decision, rejection or
//! relay. A session owns its sockets exclusively and never outlives them.

use crate::codec::PacketBuilder;
use crate::config::ProxyConfig;
use crate::connection::{Connection, ConnectionState};
use crate::error::Result;
use crate::relay::relay;
use crate::router::{Route, requested_hostname};
use crate::types::{self, ChatMessage, Handshake, StatusResponse};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, error, info};

/// Message shown to clients whose declared hostname has no route.
const REJECT_TEXT: &str = "Please use a valid address to connect!";

/// Session outcome code carried on the per-session log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Connect,
    BadAddr,
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Connect => "CONNECT",
            Outcome::BadAddr => "BAD_ADDR",
            Outcome::Error => "ERROR",
        })
    }
}

/// Main session workflow. Runs on its own task; every exit path drops (and
/// thereby closes) the sockets it owns.
pub async fn handle_conn(config: Arc<ProxyConfig>, stream: TcpStream, peer: SocketAddr) {
    let mut client = Connection::new(stream);

    let handshake = match read_handshake(&mut client).await {
        Ok(Some(hs)) => hs,
        Ok(None) => {
            debug!(%peer, "peer closed before completing a handshake");
            return;
        }
        Err(e) => {
            debug!(%peer, "handshake failed: {}", e);
            return;
        }
    };
    let host = requested_hostname(&handshake.server_address).to_string();

    match config.router.resolve(&handshake.server_address) {
        None => {
            info!(%peer, %host, outcome = %Outcome::BadAddr, "no route for requested address");
            if let Err(e) = reject(client).await {
                debug!(%peer, %host, "rejection path ended: {}", e);
            }
        }
        Some(route) => match connect_backend(route, &handshake).await {
            Ok(backend) => {
                info!(%peer, %host, backend = %route.backend_addr(), outcome = %Outcome::Connect, "proxying connection");
                match run_relay(client, backend).await {
                    Ok((up, down)) => {
                        debug!(%peer, %host, bytes_up = up, bytes_down = down, "relay finished")
                    }
                    Err(e) => debug!(%peer, %host, "relay ended with error: {}", e),
                }
            }
            Err(e) => {
                error!(%peer, %host, backend = %route.backend_addr(), outcome = %Outcome::Error, "backend dial failed: {}", e);
            }
        },
    }
}

/// Reads exactly one Handshake packet and advances the connection into the
/// state it declares. `Ok(None)` means the peer left without sending one.
async fn read_handshake(client: &mut Connection<TcpStream>) -> Result<Option<Handshake>> {
    let Some(packet) = client.read_packet().await? else {
        return Ok(None);
    };
    let handshake = Handshake::decode(&packet)?;
    let next = ConnectionState::from_next_state(handshake.next_state)?;
    client.advance(next);
    Ok(Some(handshake))
}

/// In-protocol rejection for unroutable hostnames. Status peers get a
/// synthetic server list entry and ping echoes until they hang up; Login
/// peers get exactly one disconnect packet followed by an active close.
async fn reject(mut client: Connection<TcpStream>) -> Result<()> {
    let reason = ChatMessage {
        text: REJECT_TEXT.to_string(),
        color: Some("red".to_string()),
    };
    match client.state() {
        ConnectionState::Status => {
            let status = StatusResponse::placeholder(reason);
            let response = PacketBuilder::new(types::STATUS_RESPONSE)
                .json(&status)?
                .encode();
            while let Some(packet) = client.read_packet().await? {
                match packet.id {
                    types::STATUS_REQUEST => client.send(&response).await?,
                    types::PING => {
                        let echo = packet.reader().read_bytes(8)?;
                        client
                            .send(&PacketBuilder::new(types::PONG).raw(echo).encode())
                            .await?;
                    }
                    _ => unreachable!("filtered by the state legality table"),
                }
            }
        }
        ConnectionState::Login => {
            let disconnect = PacketBuilder::new(types::LOGIN_DISCONNECT)
                .json(&reason)?
                .encode();
            client.send(&disconnect).await?;
            client.shutdown().await?;
        }
        state => unreachable!("rejection entered in {state:?} state"),
    }
    Ok(())
}

/// Dials the backend once and replays the handshake with the backend's own
/// configured host and port substituted in. No retry on failure.
async fn connect_backend(route: &Route, handshake: &Handshake) -> std::io::Result<TcpStream> {
    let mut backend = TcpStream::connect((route.host.as_str(), route.port)).await?;
    let forwarded = Handshake {
        protocol_version: handshake.protocol_version,
        server_address: route.host.clone(),
        server_port: route.port,
        next_state: handshake.next_state,
    };
    backend.write_all(&forwarded.encode()).await?;
    Ok(backend)
}

/// Detaches the client from packet inspection, flushes any bytes it had
/// pipelined behind the handshake, and pumps raw bytes both ways.
async fn run_relay(client: Connection<TcpStream>, mut backend: TcpStream) -> std::io::Result<(u64, u64)> {
    let (mut client_stream, residual) = client.into_raw();
    if !residual.is_empty() {
        backend.write_all(&residual).await?;
    }
    relay(&mut client_stream, &mut backend).await
}
