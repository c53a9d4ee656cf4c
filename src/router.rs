//! waypoint/src/router.rs
//! Static hostname to backend-address lookup.

use std::collections::HashMap;

/// One virtual backend identity. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Hostname clients declare in the handshake.
    pub hostname: String,
    /// Backend to dial, and the address pair substituted into the forwarded
    /// handshake (backends may validate those fields themselves).
    pub host: String,
    pub port: u16,
}

impl Route {
    pub fn backend_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read-only after construction; lookups from concurrent sessions need no
/// synchronization.
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<String, Route>,
}

impl Router {
    /// Builds the table from the startup configuration. Later entries for the
    /// same hostname replace earlier ones.
    pub fn new(routes: impl IntoIterator<Item = Route>) -> Self {
        Router {
            routes: routes
                .into_iter()
                .map(|r| (r.hostname.trim().to_string(), r))
                .collect(),
        }
    }

    /// Resolves a client-declared server address. Clients append forwarded
    /// host metadata after a NUL separator; only the prefix up to the first
    /// NUL is significant, matched exactly after trimming.
    pub fn resolve(&self, server_address: &str) -> Option<&Route> {
        self.routes.get(requested_hostname(server_address))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The routing-significant prefix of a declared server address.
pub fn requested_hostname(server_address: &str) -> &str {
    match server_address.split_once('\0') {
        Some((prefix, _)) => prefix.trim(),
        None => server_address.trim(),
    }
}
