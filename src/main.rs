//! waypoint/src/main.rs
//! CLI entry point: parse the routing table, bind, serve.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use waypoint::config::{self, ProxyConfig};
use waypoint::router::{Route, Router};

#[derive(Parser, Debug)]
#[command(
    name = "waypoint",
    about = "Hostname-routing reverse proxy for the Minecraft handshake protocol"
)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Route mappings, one per virtual backend: hostname=backendhost:port
    /// (backend host defaults to 127.0.0.1, port to 25565)
    #[arg(value_name = "MAPPING", value_parser = config::parse_route, required = true)]
    routes: Vec<Route>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    waypoint::logging::init("info");
    let args = Args::parse();

    let config = Arc::new(ProxyConfig {
        listen_port: args.port,
        router: Router::new(args.routes),
    });

    let listener = TcpListener::bind(("0.0.0.0", config.listen_port))
        .await
        .with_context(|| format!("binding port {}", config.listen_port))?;

    waypoint::serve(listener, config).await;
    Ok(())
}
