//! waypoint/src/server.rs
//! Accept loop: one task per connection, nothing shared but the config.

use crate::config::ProxyConfig;
use crate::session::handle_conn;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Serves connections from an already-bound listener until accept fails.
/// Sessions run on their own tasks; one session's failure never reaches
/// another, and none of them outlive their sockets.
pub async fn serve(listener: TcpListener, config: Arc<ProxyConfig>) {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    for route in config.router.iter() {
        info!(hostname = %route.hostname, backend = %route.backend_addr(), "route");
    }

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(handle_conn(config.clone(), stream, peer));
            }
            Err(e) => {
                error!("accept error: {}", e);
                break;
            }
        }
    }
}
