//! Application configuration model.
//!
//! Loaded through figment with hierarchical merging (defaults, YAML file,
//! `TRIPKIT_`-prefixed environment variables).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub legacy: LegacyConfig,
    pub autosave: AutosaveConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database URL for the structured store.
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "sqlite:.tripkit/tripkit.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Directory holding per-user legacy JSON dumps from earlier app
    /// versions. Empty means "no legacy data on this install".
    pub path: String,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            path: ".tripkit/legacy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Delay after the last edit before a debounced write commits.
    pub debounce_ms: u64,
    /// Field keys that bypass debouncing and write immediately. These are
    /// the cross-entity mirror fields that must not sit transiently
    /// inconsistent between passport and personal info.
    pub immediate_fields: Vec<String>,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            immediate_fields: vec![
                "personalInfo.dateOfBirth".to_string(),
                "personalInfo.gender".to_string(),
                "passport.dateOfBirth".to_string(),
                "passport.gender".to_string(),
                "passport.expiryDate".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
