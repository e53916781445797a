//! Stored secrets and one-time codes for connect passwords
//!
//! The password sent to the service is the secret stored in the OS
//! credential store (keyed by service name and profile name) immediately
//! followed by a one-time code typed by the operator.

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error(
        "No secret stored for '{account}' under service '{service}'. \
         Is it missing from the keychain?"
    )]
    NotFound { service: String, account: String },

    #[error("Credential store error for '{account}': {message}")]
    Store { account: String, message: String },

    #[error("Failed to read one-time code: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Read-only access to an OS credential store
pub trait SecretStore {
    fn secret(&self, service: &str, account: &str) -> Result<String, CredentialError>;
}

/// Source of operator-entered one-time codes
pub trait CodePrompt {
    fn one_time_code(&self) -> Result<String, CredentialError>;
}

/// Secrets from the platform keychain via `keyring`
pub struct KeyringStore;

impl SecretStore for KeyringStore {
    fn secret(&self, service: &str, account: &str) -> Result<String, CredentialError> {
        let store_error = |e: keyring::Error| CredentialError::Store {
            account: account.to_string(),
            message: e.to_string(),
        };

        let entry = keyring::Entry::new(service, account).map_err(store_error)?;
        match entry.get_password() {
            Ok(secret) => Ok(secret.trim().to_string()),
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound {
                service: service.to_string(),
                account: account.to_string(),
            }),
            Err(e) => Err(store_error(e)),
        }
    }
}

/// Reads the code from the controlling terminal without echo
pub struct TerminalPrompt;

impl CodePrompt for TerminalPrompt {
    fn one_time_code(&self) -> Result<String, CredentialError> {
        let code = rpassword::prompt_password("Enter the OTP code: ")?;
        Ok(code.trim().to_string())
    }
}

/// Stored secret followed by a fresh one-time code, no separator
pub fn gather_password(
    store: &dyn SecretStore,
    prompt: &dyn CodePrompt,
    service: &str,
    account: &str,
) -> Result<String, CredentialError> {
    info!("Fetching PIN for {} from keychain service {}", account, service);
    let secret = store.secret(service, account)?;
    info!("Fetched a PIN from keychain");

    let code = prompt.one_time_code()?;
    Ok(format!("{secret}{code}"))
}
