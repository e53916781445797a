//! Boundary to the local Pritunl client service
//!
//! The service owns both halves of the state this tool works with:
//!
//! - profile definitions, stored as `<key>.conf` / `<key>.ovpn` files in the
//!   client's profile directory
//! - live connection state, served over a small HTTP API on localhost
//!
//! Nothing here is cached between invocations; every call reads fresh data.

pub mod http;
pub mod profiles;

pub use http::DaemonClient;
pub use profiles::{Profile, ProfileRegistry};

use serde::Deserialize;
use thiserror::Error;

/// Client service errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to Pritunl client service failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Pritunl client service returned {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("Failed to read profile data: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid response from Pritunl client service: {0}")]
    InvalidResponse(String),

    #[error("Unknown profile key: {0}")]
    UnknownProfile(String),
}

/// Operations the core needs from the client service
///
/// Connect, disconnect and stop are requests: the service acts on them in the
/// background and the caller observes the effect through `check_status` and
/// `connections`.
#[allow(async_fn_in_trait)]
pub trait SessionService {
    /// All profiles defined in the client
    async fn profiles(&self) -> Result<ProfileRegistry, ClientError>;

    /// Current live connections
    async fn connections(&self) -> Result<ConnectionSnapshot, ClientError>;

    /// Ask the service to bring up `key`
    async fn connect_profile(
        &self,
        key: &str,
        server_hint: &str,
        password: &str,
    ) -> Result<(), ClientError>;

    /// Ask the service to tear down `key`
    async fn disconnect_profile(&self, key: &str) -> Result<(), ClientError>;

    /// Ask the service to tear down every connection
    async fn stop_connections(&self) -> Result<(), ClientError>;

    /// Whether the most recent connect attempt has completed
    async fn check_status(&self) -> Result<bool, ClientError>;
}

/// A single live connection as reported by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LiveConnection {
    /// Profile key, taken from the snapshot's object key
    #[serde(skip)]
    pub key: String,
    #[serde(default)]
    pub status: String,
    /// Connection start, epoch seconds; 0 when not connected
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub client_addr: String,
    #[serde(default)]
    pub server_addr: String,
}

/// Live connections in the order the service listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    connections: Vec<LiveConnection>,
}

impl ConnectionSnapshot {
    pub fn new(connections: Vec<LiveConnection>) -> Self {
        Self { connections }
    }

    /// Parse the `GET /profile` body: an object keyed by profile key
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let map = match value {
            serde_json::Value::Object(map) => map,
            // An idle service answers with null instead of {}
            serde_json::Value::Null => return Ok(Self::default()),
            other => {
                return Err(ClientError::InvalidResponse(format!(
                    "expected an object of connections, got {other}"
                )));
            }
        };

        let mut connections = Vec::with_capacity(map.len());
        for (key, entry) in map {
            let mut conn: LiveConnection = serde_json::from_value(entry)
                .map_err(|e| ClientError::InvalidResponse(format!("connection {key}: {e}")))?;
            conn.key = key;
            connections.push(conn);
        }

        Ok(Self { connections })
    }

    pub fn get(&self, key: &str) -> Option<&LiveConnection> {
        self.connections.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveConnection> {
        self.connections.iter()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
