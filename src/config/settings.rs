//! User settings for Bookkeeper
//!
//! Stored as JSON next to the data directory. Every field has a default, so
//! older or partial files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::BookkeeperPaths;
use crate::error::BookkeeperError;
use crate::models::Period;
use crate::storage::BackendKind;

/// Limits for the budgets created by `init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBudgets {
    pub day: i64,
    pub week: i64,
    pub month: i64,
}

impl DefaultBudgets {
    pub fn limit_for(&self, period: Period) -> i64 {
        match period {
            Period::Day => self.day,
            Period::Week => self.week,
            Period::Month => self.month,
        }
    }
}

impl Default for DefaultBudgets {
    fn default() -> Self {
        Self {
            day: 1000,
            week: 7000,
            month: 30000,
        }
    }
}

/// User settings for Bookkeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of this file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Repository backend
    #[serde(default)]
    pub backend: BackendKind,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether mutations are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// Limits for the budgets created by `init`
    #[serde(default)]
    pub default_budgets: DefaultBudgets,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: BackendKind::default(),
            log_level: default_log_level(),
            audit_enabled: default_audit_enabled(),
            default_budgets: DefaultBudgets::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &BookkeeperPaths) -> Result<Self, BookkeeperError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BookkeeperError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BookkeeperError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BookkeeperPaths) -> Result<(), BookkeeperError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BookkeeperError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BookkeeperError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
