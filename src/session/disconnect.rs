//! Tearing profiles down

use crate::daemon::{ClientError, ProfileRegistry, SessionService};
use crate::session::lookup::{find_profiles, ProfileMatch};
use tracing::{debug, warn};

pub const ALL_TARGET: &str = "all";

/// What a disconnect request addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnected {
    /// Every connection, in one request
    All,
    /// This many individually matched profiles; 0 when nothing matched
    Profiles(usize),
}

/// Disconnect `target`: the literal `all`, or every profile whose name or id
/// equals it
pub async fn disconnect<S: SessionService>(
    service: &S,
    registry: &ProfileRegistry,
    target: &str,
) -> Result<Disconnected, ClientError> {
    if target == ALL_TARGET {
        service.stop_connections().await?;
        return Ok(Disconnected::All);
    }

    let found = find_profiles(registry, target);
    match &found {
        ProfileMatch::NotFound => debug!("No profile matches '{}'", target),
        ProfileMatch::Unique(_) => {}
        ProfileMatch::Ambiguous(profiles) => warn!(
            "'{}' matches {} profiles, disconnecting all of them",
            target,
            profiles.len()
        ),
    }

    let profiles = found.into_profiles();

    for profile in &profiles {
        service.disconnect_profile(&profile.key).await?;
    }
    Ok(Disconnected::Profiles(profiles.len()))
}
