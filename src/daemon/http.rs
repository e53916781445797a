//! HTTP client for the Pritunl client service
//!
//! Endpoints used:
//! - `GET /profile` - live connections
//! - `POST /profile` - start a connection
//! - `DELETE /profile` - stop one connection
//! - `POST /stop` - stop every connection
//! - `GET /status` - whether the last connect attempt finished

use super::{ClientError, ConnectionSnapshot, Profile, ProfileRegistry, SessionService};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const USER_AGENT: &str = "pritunl";
const DEFAULT_USERNAME: &str = "pritunl";

pub struct DaemonClient {
    client: Client,
    base_url: String,
    auth_key: Option<String>,
    profiles_dir: PathBuf,
}

/// `POST /profile` body
#[derive(Debug, Serialize)]
struct ConnectRequest<'a> {
    id: &'a str,
    mode: &'a str,
    org_id: &'a str,
    user_id: &'a str,
    server_id: &'a str,
    sync_hosts: Value,
    sync_token: &'a str,
    username: &'a str,
    password: &'a str,
    server_box_public_key: &'a str,
    reconnect: bool,
    timeout: bool,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct ProfileId<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: bool,
}

impl DaemonClient {
    /// Create a client for the service at `base_url`
    ///
    /// An unreadable auth key file is not fatal: requests are sent without
    /// the header and the service decides whether to reject them.
    pub fn new(
        base_url: &str,
        auth_key_path: &Path,
        profiles_dir: PathBuf,
    ) -> Result<Self, ClientError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        let auth_key = match std::fs::read_to_string(auth_key_path) {
            Ok(key) => Some(key.trim().to_string()),
            Err(e) => {
                warn!("Could not read auth key {}: {}", auth_key_path.display(), e);
                None
            }
        };

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_key,
            profiles_dir,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.auth_key {
            Some(key) => builder.header("Auth-Key", key),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<String, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} -> {}: {}", path, status, body);

        if !status.is_success() {
            return Err(ClientError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(body)
    }
}

fn connect_request<'a>(
    profile: &'a Profile,
    server_hint: &'a str,
    password: &'a str,
    data: &'a str,
) -> ConnectRequest<'a> {
    ConnectRequest {
        id: &profile.key,
        mode: "ovpn",
        org_id: profile.conf_str("organization_id"),
        user_id: profile.conf_str("user_id"),
        server_id: profile.conf_str("server_id"),
        sync_hosts: profile
            .conf
            .get("sync_hosts")
            .cloned()
            .unwrap_or(Value::Array(vec![])),
        sync_token: profile.conf_str("sync_token"),
        username: if server_hint.is_empty() { DEFAULT_USERNAME } else { server_hint },
        password,
        server_box_public_key: profile.conf_str("server_box_public_key"),
        reconnect: true,
        timeout: true,
        data,
    }
}

impl SessionService for DaemonClient {
    async fn profiles(&self) -> Result<ProfileRegistry, ClientError> {
        Ok(ProfileRegistry::load(&self.profiles_dir)?)
    }

    async fn connections(&self) -> Result<ConnectionSnapshot, ClientError> {
        let body = self.send("/profile", self.request(Method::GET, "/profile")).await?;
        ConnectionSnapshot::from_json(&body)
    }

    async fn connect_profile(
        &self,
        key: &str,
        server_hint: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let registry = self.profiles().await?;
        let profile = registry
            .get(key)
            .ok_or_else(|| ClientError::UnknownProfile(key.to_string()))?;
        let data = tokio::fs::read_to_string(profile.ovpn_path()).await?;

        info!("Requesting connection for {}", profile.name);
        let body = connect_request(profile, server_hint, password, &data);
        self.send("/profile", self.request(Method::POST, "/profile").json(&body))
            .await?;
        Ok(())
    }

    async fn disconnect_profile(&self, key: &str) -> Result<(), ClientError> {
        info!("Requesting disconnect for {}", key);
        let builder = self
            .request(Method::DELETE, "/profile")
            .json(&ProfileId { id: key });
        self.send("/profile", builder).await?;
        Ok(())
    }

    async fn stop_connections(&self) -> Result<(), ClientError> {
        info!("Requesting disconnect for all profiles");
        self.send("/stop", self.request(Method::POST, "/stop")).await?;
        Ok(())
    }

    async fn check_status(&self) -> Result<bool, ClientError> {
        let body = self.send("/status", self.request(Method::GET, "/status")).await?;
        let status: StatusResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(status.status)
    }
}
