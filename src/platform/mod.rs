//! Platform-specific locations of the Pritunl client's files

#[cfg(target_os = "macos")]
pub mod mac;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Could not determine the {0} directory")]
    MissingDirectory(&'static str),
    #[error("Unsupported platform")]
    UnsupportedPlatform,
}

/// Where the Pritunl client keeps its state on this OS
pub trait PlatformLayout {
    /// Directory containing the `<key>.conf` / `<key>.ovpn` profile pairs
    fn profiles_dir(&self) -> Result<PathBuf, PlatformError>;
    /// File holding the key the client service expects in `Auth-Key`
    fn auth_key_path(&self) -> PathBuf;
    /// Whether connecting prompts for a one-time code by default
    fn one_time_code_default(&self) -> bool;
}

/// Get the layout for the current platform
pub fn get_platform_layout() -> Result<Box<dyn PlatformLayout>, PlatformError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(mac::MacLayout::new()))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::LinuxLayout::new()))
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WindowsLayout::new()))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Err(PlatformError::UnsupportedPlatform)
    }
}
