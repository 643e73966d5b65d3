//! Server configuration.
//!
//! Built once at startup from defaults, then `CSVMATRIX_*` environment
//! variables (a `.env` file is loaded by the binary), then CLI flags.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::api::routes::RouteTable;
use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 8080;

/// Matches axum's own default body limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

pub const ENV_HOST: &str = "CSVMATRIX_HOST";
pub const ENV_PORT: &str = "CSVMATRIX_PORT";
pub const ENV_MAX_UPLOAD_BYTES: &str = "CSVMATRIX_MAX_UPLOAD_BYTES";

/// Everything `start_server` needs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Request body limit for operation routes.
    pub max_upload_bytes: usize,
    pub routes: RouteTable,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            routes: RouteTable::standard(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = parse_var(ENV_HOST, &host)?;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(limit) = lookup(ENV_MAX_UPLOAD_BYTES) {
            config.max_upload_bytes = parse_var(ENV_MAX_UPLOAD_BYTES, &limit)?;
        }

        Ok(config)
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> ServerResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("{}={:?}: {}", key, raw, e)))
}
