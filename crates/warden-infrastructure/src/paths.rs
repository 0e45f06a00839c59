//! Unified path management for warden configuration files.
//!
//! Resolves platform-appropriate locations via the `dirs` crate so the
//! same layout works on Linux, macOS and Windows.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for warden.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/warden/            # Config directory
/// └── config.toml              # Guard configuration
/// ```
pub struct WardenPaths;

impl WardenPaths {
    /// Returns the warden configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/warden/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("warden"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_under_config_dir() {
        // dirs may legitimately fail in minimal environments; only check
        // the shape when resolution succeeds.
        if let Ok(path) = WardenPaths::config_file() {
            assert!(path.ends_with("warden/config.toml") || path.ends_with("config.toml"));
        }
    }
}
