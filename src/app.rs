//! Dispatch of a single requested action

use crate::config::{ConfigError, SortOrder};
use crate::daemon::{ClientError, ProfileRegistry, SessionService};
use crate::platform::PlatformError;
use crate::render::{render_json, render_names, render_table, Palette};
use crate::session::duration::now_epoch;
use crate::session::{
    active_profiles, disconnect, reconcile, ConnectError, Credentials, Disconnected, Establisher,
    StatusError,
};
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("Failed to encode listing: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Table of every profile
    List,
    /// Names of profiles with a live connection
    Active,
    /// Connect by id or name, then list
    Connect(String),
    /// Disconnect "all" or by id or name, then list
    Disconnect(String),
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub order: SortOrder,
    pub json: bool,
    pub separator: String,
    pub palette: Palette,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            order: SortOrder::Lexical,
            json: false,
            separator: String::new(),
            palette: Palette::new(false),
        }
    }
}

pub struct App<'a, S> {
    service: &'a S,
    output: OutputOptions,
    credentials: Option<Credentials<'a>>,
    establisher: Option<Establisher<'a, S>>,
}

impl<'a, S: SessionService> App<'a, S> {
    pub fn new(service: &'a S, output: OutputOptions) -> Self {
        Self {
            service,
            output,
            credentials: None,
            establisher: None,
        }
    }

    /// Credentials used to build connect passwords; without them the
    /// password is empty
    pub fn with_credentials(mut self, credentials: Credentials<'a>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the default establisher, e.g. to shorten the check interval
    pub fn with_establisher(mut self, establisher: Establisher<'a, S>) -> Self {
        self.establisher = Some(establisher);
        self
    }

    pub async fn run(mut self, action: Action, out: &mut dyn Write) -> Result<(), AppError> {
        let registry = self.service.profiles().await?;
        debug!("Loaded {} profiles", registry.len());

        match &action {
            Action::List => self.list(&registry, out).await,
            Action::Active => self.active(&registry, out).await,
            Action::Connect(target) => {
                let mut establisher = self
                    .establisher
                    .take()
                    .unwrap_or_else(|| Establisher::new(self.service));
                if let Some(credentials) = self.credentials.take() {
                    establisher = establisher.with_credentials(credentials);
                }

                let attempts = establisher.connect(&registry, target, out).await?;
                info!("Processed {} connect request(s) for '{}'", attempts.len(), target);
                self.list(&registry, out).await
            }
            Action::Disconnect(target) => {
                match disconnect(self.service, &registry, target).await? {
                    Disconnected::All => info!("Stopped all connections"),
                    Disconnected::Profiles(n) => {
                        info!("Disconnected {} profile(s) for '{}'", n, target)
                    }
                }
                self.list(&registry, out).await
            }
        }
    }

    async fn list(&self, registry: &ProfileRegistry, out: &mut dyn Write) -> Result<(), AppError> {
        if registry.is_empty() {
            return Err(StatusError::EmptyRegistry.into());
        }

        let snapshot = self.service.connections().await?;
        let listing = reconcile(registry, &snapshot, now_epoch(), self.output.order)?;

        if self.output.json {
            writeln!(out, "{}", render_json(&listing)?)?;
        } else {
            writeln!(out, "{}", render_table(&listing, self.output.palette))?;
        }
        Ok(())
    }

    async fn active(
        &self,
        registry: &ProfileRegistry,
        out: &mut dyn Write,
    ) -> Result<(), AppError> {
        let snapshot = self.service.connections().await?;
        let names = active_profiles(registry, &snapshot);
        writeln!(out, "{}", render_names(&names, &self.output.separator))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::FakeService;
    use std::time::Duration;

    fn output(json: bool) -> OutputOptions {
        OutputOptions {
            json,
            ..OutputOptions::default()
        }
    }

    #[tokio::test]
    async fn test_list_renders_every_profile() {
        let service = FakeService::never_connected();
        let mut out = Vec::new();

        App::new(&service, output(false))
            .run(Action::List, &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("home"));
        assert!(out.contains("office"));
        assert!(out.contains("Disconnected"));
        assert!(!out.contains("Connected for"));
    }

    #[tokio::test]
    async fn test_list_json() {
        let service = FakeService::never_connected();
        let mut out = Vec::new();

        App::new(&service, output(true))
            .run(Action::List, &mut out)
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_connect_then_lists() {
        let service = FakeService::connected_after(1);
        let mut out = Vec::new();

        App::new(&service, output(false))
            .with_establisher(Establisher::new(&service).with_check_interval(Duration::ZERO))
            .run(Action::Connect("home".into()), &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Connecting.\n"));
        assert!(out.contains("office"));
        assert_eq!(service.connected().len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_all_then_lists() {
        let service = FakeService::never_connected();
        let mut out = Vec::new();

        App::new(&service, output(false))
            .run(Action::Disconnect("all".into()), &mut out)
            .await
            .unwrap();

        assert_eq!(service.stops(), 1);
        assert!(String::from_utf8(out).unwrap().contains("home"));
    }

    #[tokio::test]
    async fn test_active_with_no_connections_prints_empty_line() {
        let service = FakeService::never_connected();
        let mut out = Vec::new();

        App::new(&service, output(false))
            .run(Action::Active, &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "\n");
    }

    #[tokio::test]
    async fn test_disconnect_failure_is_returned() {
        let service = FakeService::never_connected();
        service.fail_requests();

        let result = App::new(&service, output(false))
            .run(Action::Disconnect("all".into()), &mut io::sink())
            .await;

        assert!(matches!(result, Err(AppError::Client(_))));
    }
}
