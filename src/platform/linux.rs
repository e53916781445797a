//! Linux file layout

use super::{PlatformError, PlatformLayout};
use std::path::PathBuf;

pub struct LinuxLayout;

impl LinuxLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformLayout for LinuxLayout {
    fn profiles_dir(&self) -> Result<PathBuf, PlatformError> {
        let config = dirs::config_dir().ok_or(PlatformError::MissingDirectory("config"))?;
        Ok(config.join("pritunl").join("profiles"))
    }

    fn auth_key_path(&self) -> PathBuf {
        PathBuf::from("/var/run/pritunl.auth")
    }

    fn one_time_code_default(&self) -> bool {
        false
    }
}
