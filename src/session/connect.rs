//! Bringing a profile up
//!
//! For each profile matching the requested id or name:
//!
//! 1. Gather credentials (stored secret + one-time code) when enabled
//! 2. Send the connect request to the client service
//! 3. Poll the service once per interval, at most [`MAX_STATUS_CHECKS`] times,
//!    until it reports the attempt finished
//!
//! Running out of checks is not an error; the listing printed afterwards
//! shows whatever state the profile reached.

use crate::daemon::{ClientError, Profile, ProfileRegistry, SessionService};
use crate::session::credentials::{gather_password, CodePrompt, CredentialError, SecretStore};
use crate::session::lookup::{find_profiles, ProfileMatch};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MAX_STATUS_CHECKS: u32 = 30;
pub const STATUS_CHECK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Cannot connect without credentials: {0}")]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Failed to write progress: {0}")]
    Progress(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The service reported completion on status check number `checks`
    Established { checks: u32 },
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAttempt {
    pub key: String,
    pub name: String,
    pub outcome: ConnectOutcome,
}

/// Where connect passwords come from
pub struct Credentials<'a> {
    pub store: &'a dyn SecretStore,
    pub prompt: &'a dyn CodePrompt,
    /// Keychain service name; the account is the profile's display name
    pub service: &'a str,
}

pub struct Establisher<'a, S> {
    service: &'a S,
    credentials: Option<Credentials<'a>>,
    check_interval: Duration,
}

impl<'a, S: SessionService> Establisher<'a, S> {
    /// Connects with an empty password and the default one second interval
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            credentials: None,
            check_interval: STATUS_CHECK_INTERVAL,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials<'a>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Connect every profile whose name or id equals `target`
    pub async fn connect(
        &self,
        registry: &ProfileRegistry,
        target: &str,
        progress: &mut dyn Write,
    ) -> Result<Vec<ConnectAttempt>, ConnectError> {
        let found = find_profiles(registry, target);
        match &found {
            ProfileMatch::NotFound => debug!("No profile matches '{}'", target),
            ProfileMatch::Unique(_) => {}
            ProfileMatch::Ambiguous(profiles) => warn!(
                "'{}' matches {} profiles, connecting all of them",
                target,
                profiles.len()
            ),
        }

        let profiles = found.into_profiles();

        let mut attempts = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let outcome = self.establish(profile, progress).await?;
            attempts.push(ConnectAttempt {
                key: profile.key.clone(),
                name: profile.name.clone(),
                outcome,
            });
        }
        Ok(attempts)
    }

    async fn establish(
        &self,
        profile: &Profile,
        progress: &mut dyn Write,
    ) -> Result<ConnectOutcome, ConnectError> {
        let password = match &self.credentials {
            Some(creds) => {
                gather_password(creds.store, creds.prompt, creds.service, &profile.name)?
            }
            None => String::new(),
        };

        info!("Connecting profile {} ({})", profile.id, profile.name);
        self.service.connect_profile(&profile.key, "", &password).await?;

        let outcome = self.wait_connected(progress).await?;
        match outcome {
            ConnectOutcome::Established { checks } => {
                debug!("{} reported connected after {} checks", profile.name, checks)
            }
            ConnectOutcome::TimedOut => debug!(
                "{} not confirmed after {} checks",
                profile.name, MAX_STATUS_CHECKS
            ),
        }
        Ok(outcome)
    }

    async fn wait_connected(&self, progress: &mut dyn Write) -> io::Result<ConnectOutcome> {
        write!(progress, "Connecting")?;
        progress.flush()?;

        let mut outcome = ConnectOutcome::TimedOut;
        for check in 1..=MAX_STATUS_CHECKS {
            write!(progress, ".")?;
            progress.flush()?;
            tokio::time::sleep(self.check_interval).await;

            match self.service.check_status().await {
                Ok(true) => {
                    outcome = ConnectOutcome::Established { checks: check };
                    break;
                }
                Ok(false) => {}
                Err(e) => debug!("Status check {} failed: {}", check, e),
            }
        }

        writeln!(progress)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{registry, FakeService};
    use std::cell::Cell;

    struct StaticStore;

    impl SecretStore for StaticStore {
        fn secret(&self, _service: &str, account: &str) -> Result<String, CredentialError> {
            Ok(format!("pin-{account}-"))
        }
    }

    struct EmptyStore;

    impl SecretStore for EmptyStore {
        fn secret(&self, service: &str, account: &str) -> Result<String, CredentialError> {
            Err(CredentialError::NotFound {
                service: service.to_string(),
                account: account.to_string(),
            })
        }
    }

    struct CountingPrompt(Cell<u32>);

    impl CodePrompt for CountingPrompt {
        fn one_time_code(&self) -> Result<String, CredentialError> {
            self.0.set(self.0.get() + 1);
            Ok("123456".to_string())
        }
    }

    #[tokio::test]
    async fn test_connect_established_on_first_affirmative_check() {
        let service = FakeService::connected_after(3);
        let registry = registry();
        let mut out = Vec::new();

        let attempts = Establisher::new(&service)
            .with_check_interval(Duration::ZERO)
            .connect(&registry, "office", &mut out)
            .await
            .unwrap();

        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].key, "b");
        assert_eq!(attempts[0].outcome, ConnectOutcome::Established { checks: 3 });
        assert_eq!(service.status_checks(), 3);
        assert_eq!(service.connected(), vec![("b".to_string(), String::new())]);
        assert_eq!(String::from_utf8(out).unwrap(), "Connecting...\n");
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_thirty_checks() {
        let service = FakeService::never_connected();
        let registry = registry();
        let mut out = Vec::new();

        let attempts = Establisher::new(&service)
            .with_check_interval(Duration::ZERO)
            .connect(&registry, "1", &mut out)
            .await
            .unwrap();

        assert_eq!(attempts[0].outcome, ConnectOutcome::TimedOut);
        assert_eq!(service.status_checks(), MAX_STATUS_CHECKS);
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches('.').count(), MAX_STATUS_CHECKS as usize);
        assert!(out.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_failed_status_check_keeps_polling() {
        let service = FakeService::connected_after(2);
        service.fail_next_status_check();
        let registry = registry();

        let attempts = Establisher::new(&service)
            .with_check_interval(Duration::ZERO)
            .connect(&registry, "home", &mut io::sink())
            .await
            .unwrap();

        assert_eq!(attempts[0].outcome, ConnectOutcome::Established { checks: 2 });
    }

    #[tokio::test]
    async fn test_connect_no_match_is_noop() {
        let service = FakeService::connected_after(1);
        let registry = registry();

        let attempts = Establisher::new(&service)
            .connect(&registry, "nowhere", &mut io::sink())
            .await
            .unwrap();

        assert!(attempts.is_empty());
        assert!(service.connected().is_empty());
        assert_eq!(service.status_checks(), 0);
    }

    #[tokio::test]
    async fn test_connect_ambiguous_token_connects_every_match() {
        // profile "c" is named "2", profile "b" has id 2
        let service = FakeService::connected_after(1);
        let registry = registry();

        let attempts = Establisher::new(&service)
            .with_check_interval(Duration::ZERO)
            .connect(&registry, "2", &mut io::sink())
            .await
            .unwrap();

        let keys: Vec<&str> = attempts.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert_eq!(service.connected().len(), 2);
    }

    #[tokio::test]
    async fn test_connect_with_credentials_builds_password() {
        let service = FakeService::connected_after(1);
        let registry = registry();
        let prompt = CountingPrompt(Cell::new(0));

        Establisher::new(&service)
            .with_credentials(Credentials {
                store: &StaticStore,
                prompt: &prompt,
                service: "pritunl-auth",
            })
            .with_check_interval(Duration::ZERO)
            .connect(&registry, "office", &mut io::sink())
            .await
            .unwrap();

        assert_eq!(prompt.0.get(), 1);
        assert_eq!(
            service.connected(),
            vec![("b".to_string(), "pin-office-123456".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_secret_stops_before_connecting() {
        let service = FakeService::connected_after(1);
        let registry = registry();
        let prompt = CountingPrompt(Cell::new(0));

        let result = Establisher::new(&service)
            .with_credentials(Credentials {
                store: &EmptyStore,
                prompt: &prompt,
                service: "pritunl-auth",
            })
            .connect(&registry, "office", &mut io::sink())
            .await;

        assert!(matches!(result, Err(ConnectError::Credential(_))));
        assert_eq!(prompt.0.get(), 0);
        assert!(service.connected().is_empty());
    }
}
