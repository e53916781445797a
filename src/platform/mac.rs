//! macOS file layout
//!
//! The one-time-code flow is on by default here: the stored PIN lives in the
//! login keychain and is completed with a code typed at connect time.

use super::{PlatformError, PlatformLayout};
use std::path::PathBuf;

pub struct MacLayout;

impl MacLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformLayout for MacLayout {
    fn profiles_dir(&self) -> Result<PathBuf, PlatformError> {
        // ~/Library/Application Support
        let support =
            dirs::data_dir().ok_or(PlatformError::MissingDirectory("application support"))?;
        Ok(support.join("pritunl").join("profiles"))
    }

    fn auth_key_path(&self) -> PathBuf {
        PathBuf::from("/Applications/Pritunl.app/Contents/Resources/auth")
    }

    fn one_time_code_default(&self) -> bool {
        true
    }
}
