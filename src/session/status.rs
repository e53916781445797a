//! Merging profile definitions with live connection state

use crate::config::SortOrder;
use crate::daemon::{ConnectionSnapshot, ProfileRegistry};
use crate::session::duration::format_since;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StatusError {
    #[error("No profiles found in Pritunl")]
    EmptyRegistry,
}

/// Status shown for a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
    /// Any other title-cased status the service reports, e.g. "Connecting"
    Other(String),
}

impl ConnectionStatus {
    fn from_live(status: &str) -> Self {
        let title = title_case(status);
        if title == "Connected" {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Other(title)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Other(status) => status,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConnectionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of the connection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub id: u32,
    pub name: String,
    pub status: ConnectionStatus,
    /// Empty unless the connection reported a start time
    pub since: String,
    pub client_addr: String,
    pub server_addr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub records: Vec<DisplayRecord>,
    /// When false only id, name and status carry information
    pub any_connected: bool,
}

/// Build one record per profile, ordered by id according to `order`
pub fn reconcile(
    registry: &ProfileRegistry,
    snapshot: &ConnectionSnapshot,
    now: i64,
    order: SortOrder,
) -> Result<Reconciliation, StatusError> {
    if registry.is_empty() {
        return Err(StatusError::EmptyRegistry);
    }

    let mut any_connected = false;
    let mut records: Vec<DisplayRecord> = registry
        .iter()
        .map(|profile| {
            let mut record = DisplayRecord {
                id: profile.id,
                name: profile.name.clone(),
                status: ConnectionStatus::Disconnected,
                since: String::new(),
                client_addr: String::new(),
                server_addr: String::new(),
            };

            if let Some(live) = snapshot.get(&profile.key) {
                record.status = ConnectionStatus::from_live(&live.status);
                any_connected |= record.status == ConnectionStatus::Connected;
                if live.timestamp > 0 {
                    record.since = format_since(live.timestamp, now);
                }
                record.client_addr = live.client_addr.clone();
                record.server_addr = live.server_addr.clone();
            }

            record
        })
        .collect();

    match order {
        SortOrder::Lexical => records.sort_by_key(|r| r.id.to_string()),
        SortOrder::Numeric => records.sort_by_key(|r| r.id),
    }

    Ok(Reconciliation {
        records,
        any_connected,
    })
}

/// Names of profiles present in the snapshot, in snapshot order
pub fn active_profiles(registry: &ProfileRegistry, snapshot: &ConnectionSnapshot) -> Vec<String> {
    snapshot
        .iter()
        .filter_map(|live| registry.get(&live.key))
        .map(|profile| profile.name.clone())
        .collect()
}

/// Upper-cases the first letter of every word; any character other than a
/// letter, digit or underscore ends a word
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}
