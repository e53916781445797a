//! Resolving a user-supplied id or name to profiles

use crate::daemon::{Profile, ProfileRegistry};

/// Result of matching a token against every profile's name and id
#[derive(Debug, PartialEq)]
pub enum ProfileMatch<'a> {
    NotFound,
    Unique(&'a Profile),
    /// More than one profile answers to the token, e.g. a profile named "2"
    /// next to the profile with id 2
    Ambiguous(Vec<&'a Profile>),
}

impl<'a> ProfileMatch<'a> {
    /// Every matched profile, in registry order
    pub fn into_profiles(self) -> Vec<&'a Profile> {
        match self {
            ProfileMatch::NotFound => Vec::new(),
            ProfileMatch::Unique(profile) => vec![profile],
            ProfileMatch::Ambiguous(profiles) => profiles,
        }
    }
}

pub fn find_profiles<'a>(registry: &'a ProfileRegistry, token: &str) -> ProfileMatch<'a> {
    let mut matches: Vec<&Profile> = registry.iter().filter(|p| p.matches(token)).collect();
    match matches.len() {
        0 => ProfileMatch::NotFound,
        1 => ProfileMatch::Unique(matches.remove(0)),
        _ => ProfileMatch::Ambiguous(matches),
    }
}
