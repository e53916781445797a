//! Windows file layout

use super::{PlatformError, PlatformLayout};
use std::path::PathBuf;

pub struct WindowsLayout;

impl WindowsLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformLayout for WindowsLayout {
    fn profiles_dir(&self) -> Result<PathBuf, PlatformError> {
        // %APPDATA%
        let roaming = dirs::config_dir().ok_or(PlatformError::MissingDirectory("AppData"))?;
        Ok(roaming.join("pritunl").join("profiles"))
    }

    fn auth_key_path(&self) -> PathBuf {
        PathBuf::from(r"C:\ProgramData\Pritunl\auth")
    }

    fn one_time_code_default(&self) -> bool {
        false
    }
}
