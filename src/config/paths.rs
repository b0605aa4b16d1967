//! Path management for Bookkeeper
//!
//! ## Path Resolution Order
//!
//! 1. `BOOKKEEPER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/bookkeeper` or `~/.config/bookkeeper`
//! 3. Windows: `%APPDATA%\bookkeeper`

use std::path::PathBuf;

use crate::error::BookkeeperError;

/// Manages all paths used by Bookkeeper
#[derive(Debug, Clone)]
pub struct BookkeeperPaths {
    /// Base directory for all Bookkeeper data
    base_dir: PathBuf,

    /// Explicit database location overriding `data/bookkeeper.db`
    database_override: Option<PathBuf>,
}

impl BookkeeperPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BookkeeperError> {
        let base_dir = if let Ok(custom) = std::env::var("BOOKKEEPER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self::with_base_dir(base_dir))
    }

    /// Create BookkeeperPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            database_override: None,
        }
    }

    /// Use `path` as the database file instead of the default location
    pub fn with_database_file(mut self, path: PathBuf) -> Self {
        self.database_override = Some(path);
        self
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/bookkeeper/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the SQLite database
    pub fn database_file(&self) -> PathBuf {
        self.database_override
            .clone()
            .unwrap_or_else(|| self.data_dir().join("bookkeeper.db"))
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BookkeeperError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BookkeeperError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BookkeeperError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BookkeeperError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                BookkeeperError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("bookkeeper"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BookkeeperError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BookkeeperError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("bookkeeper"))
}
