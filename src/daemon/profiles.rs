//! Profile registry loaded from the client's profile directory
//!
//! Each profile is a pair of files sharing a key:
//!
//! | File | Contents |
//! |------|----------|
//! | `<key>.conf` | JSON document (name, user, server, org/user/server ids, ...) |
//! | `<key>.ovpn` | OpenVPN configuration sent to the service on connect |
//!
//! Numeric ids are the 1-based position of the `.conf` file in the
//! directory listing sorted by file name.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Registry key (file stem), the join key against live connections
    pub key: String,
    pub id: u32,
    /// Display name
    pub name: String,
    /// Raw `.conf` document
    pub conf: Value,
    /// Path of the `.conf` file
    pub path: PathBuf,
}

impl Profile {
    pub fn new(key: impl Into<String>, id: u32, conf: Value, path: PathBuf) -> Self {
        let key = key.into();
        let name = display_name(&key, &conf);
        Self {
            key,
            id,
            name,
            conf,
            path,
        }
    }

    /// Whether `token` is this profile's name or numeric id
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.id.to_string() == token
    }

    /// String field from the `.conf` document, empty when absent
    pub fn conf_str(&self, field: &str) -> &str {
        self.conf.get(field).and_then(Value::as_str).unwrap_or_default()
    }

    /// Path of the OpenVPN configuration paired with this profile
    pub fn ovpn_path(&self) -> PathBuf {
        self.path.with_extension("ovpn")
    }
}

/// `name`, else `user (server)`, else the key
fn display_name(key: &str, conf: &Value) -> String {
    let field = |name: &str| conf.get(name).and_then(Value::as_str).unwrap_or_default();

    let name = field("name");
    if !name.is_empty() {
        return name.to_string();
    }

    let (user, server) = (field("user"), field("server"));
    if !user.is_empty() && !server.is_empty() {
        return format!("{user} ({server})");
    }

    key.to_string()
}

/// All known profiles, in load order (ascending id when read from disk)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
}

impl ProfileRegistry {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
        }
    }

    /// Load every `*.conf` file in `dir`
    ///
    /// A missing directory is an empty registry. Files that cannot be read
    /// or parsed are skipped but still consume an id, so ids stay stable
    /// while a broken file is being fixed.
    pub fn load(dir: &Path) -> io::Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Profile directory {} does not exist", dir.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "conf"))
            .collect();
        paths.sort();

        let mut profiles = Vec::with_capacity(paths.len());
        for (index, path) in paths.into_iter().enumerate() {
            let id = index as u32 + 1;
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
            else {
                warn!("Skipping profile with non UTF-8 name: {}", path.display());
                continue;
            };

            let conf = match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())
                })
            {
                Ok(conf) => conf,
                Err(e) => {
                    warn!("Skipping profile {}: {}", path.display(), e);
                    continue;
                }
            };

            debug!("Loaded profile {} ({})", id, key);
            profiles.push(Profile::new(key, id, conf, path));
        }

        Ok(Self::new(profiles))
    }

    pub fn get(&self, key: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.key == key)
    }

    /// Profiles in load order
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
