//! waypoint/src/config.rs
//! Startup configuration. Built once by the CLI, immutable afterwards.

use crate::router::{Route, Router};

/// Default Minecraft port, used for both listening and backends when a
/// mapping omits one.
pub const DEFAULT_PORT: u16 = 25565;

/// Everything the proxy needs before accepting connections. Shared across
/// session tasks behind an `Arc`; never mutated after startup.
#[derive(Debug)]
pub struct ProxyConfig {
    pub listen_port: u16,
    pub router: Router,
}

/// Parses one `hostname=backendhost:port` mapping. The backend host defaults
/// to 127.0.0.1 and the port to 25565 when omitted.
pub fn parse_route(s: &str) -> Result<Route, String> {
    let (hostname, remote) = s
        .split_once('=')
        .ok_or_else(|| format!("expected hostname=host:port, got {s:?}"))?;
    let hostname = hostname.trim();
    if hostname.is_empty() {
        return Err(format!("empty hostname in mapping {s:?}"));
    }

    let (host, port) = match remote.split_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| format!("invalid backend port in {s:?}: {e}"))?;
            (host.trim(), port)
        }
        None => (remote.trim(), DEFAULT_PORT),
    };
    let host = if host.is_empty() { "127.0.0.1" } else { host };

    Ok(Route {
        hostname: hostname.to_string(),
        host: host.to_string(),
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mapping() {
        let route = parse_route("play.example=10.0.0.5:30000").unwrap();
        assert_eq!(route.hostname, "play.example");
        assert_eq!(route.host, "10.0.0.5");
        assert_eq!(route.port, 30000);
    }

    #[test]
    fn defaults_apply() {
        let route = parse_route("play.example=backend").unwrap();
        assert_eq!(route.port, DEFAULT_PORT);

        let route = parse_route("play.example=:30000").unwrap();
        assert_eq!(route.host, "127.0.0.1");
        assert_eq!(route.port, 30000);
    }

    #[test]
    fn rejects_malformed_mappings() {
        assert!(parse_route("no-equals-sign").is_err());
        assert!(parse_route("=backend:1").is_err());
        assert!(parse_route("  =backend:1").is_err());
        assert!(parse_route("host=backend:notaport").is_err());
        assert!(parse_route("host=backend:99999").is_err());
    }

    #[test]
    fn trims_whitespace() {
        let route = parse_route(" play.example = 10.0.0.5 : 30000 ").unwrap();
        assert_eq!(route.hostname, "play.example");
        assert_eq!(route.host, "10.0.0.5");
        assert_eq!(route.port, 30000);
    }
}
