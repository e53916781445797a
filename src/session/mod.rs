//! Profile status and session lifecycle
//!
//! - `status`: merge profiles with live connections into listing rows
//! - `connect`: credentials, connect request and bounded status polling
//! - `disconnect`: "all" or id/name teardown
//! - `lookup`: id/name resolution shared by connect and disconnect
//! - `duration`: "Connected for" strings
//! - `credentials`: keychain secret + one-time code

pub mod connect;
pub mod credentials;
pub mod disconnect;
pub mod duration;
pub mod lookup;
pub mod status;

pub use connect::{ConnectAttempt, ConnectError, ConnectOutcome, Credentials, Establisher};
pub use disconnect::{disconnect, Disconnected};
pub use status::{
    active_profiles, reconcile, ConnectionStatus, DisplayRecord, Reconciliation, StatusError,
};
