//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the guard
//! configuration from the configuration file
//! (~/.config/warden/config.toml).

use crate::paths::WardenPaths;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use warden_core::config::GuardConfig;
use warden_core::error::{Result, WardenError};

/// Configuration service that loads and caches the guard configuration.
///
/// This implementation reads the configuration from config.toml
/// and caches it to avoid repeated file I/O operations. A missing file
/// yields the defaults; a malformed file is reported once and then also
/// falls back to the defaults.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<GuardConfig>>>,
    /// Explicit file path override (used by tests and embedders).
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a new ConfigService using the default config path.
    ///
    /// The configuration is loaded lazily on first access to avoid
    /// blocking during initialization.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: None,
        }
    }

    /// Creates a ConfigService reading from an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: Some(path.into()),
        }
    }

    /// Gets the guard configuration, loading from file if not cached.
    pub fn get_config(&self) -> GuardConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|err| {
            tracing::warn!("[ConfigService] falling back to defaults: {}", err);
            GuardConfig::default()
        });

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => WardenPaths::config_file().map_err(|e| WardenError::config(e.to_string())),
        }
    }

    fn load_config(&self) -> Result<GuardConfig> {
        let path = self.config_path()?;
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] no config file at {}, using defaults",
                path.display()
            );
            return Ok(GuardConfig::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        assert_eq!(service.get_config(), GuardConfig::default());
    }

    #[test]
    fn test_loads_and_caches_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "idle_timeout_secs = 60").unwrap();
        writeln!(file, "entry_point = \"/signin\"").unwrap();

        let service = ConfigService::with_path(&path);
        let config = service.get_config();
        assert_eq!(config.idle_timeout_secs, 60);
        assert_eq!(config.entry_point, "/signin");

        // Cached: a rewrite is invisible until invalidation.
        std::fs::write(&path, "idle_timeout_secs = 90").unwrap();
        assert_eq!(service.get_config().idle_timeout_secs, 60);

        service.invalidate_cache();
        assert_eq!(service.get_config().idle_timeout_secs, 90);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "idle_timeout_secs = [broken").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config(), GuardConfig::default());
    }
}
