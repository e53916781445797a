//! pritunl-ctl - command-line controller for Pritunl client profiles
//!
//! This crate lists, connects and disconnects the profiles of a locally
//! installed Pritunl client. Tunnels themselves are run by the Pritunl client
//! service; this crate only talks to it and reconciles what it reports.
//!
//! # Architecture
//!
//! - `config`: Configuration file handling (TOML)
//! - `platform`: Per-OS locations of profiles and the service auth key
//! - `daemon`: Client service boundary, HTTP client and profile registry
//! - `session`: Status reconciliation, connect polling, disconnect
//! - `render`: Table, JSON and plain-list output
//! - `app`: Dispatch of one requested action
//!
//! # Usage
//!
//! ```bash
//! pritunl-ctl -l            # list profiles and their status
//! pritunl-ctl -c office     # connect by name or id
//! pritunl-ctl -d            # disconnect everything
//! ```

pub mod app;
pub mod config;
pub mod daemon;
pub mod platform;
pub mod render;
pub mod session;

pub use app::{Action, App, AppError, OutputOptions};
pub use config::Config;
pub use daemon::{DaemonClient, SessionService};
