// crates/audit-rollup-config/src/config.rs
// ============================================================================
// Module: Audit Rollup Configuration
// Description: Configuration loading and validation for the audit rollup tool.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: audit-rollup-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed rather than falling back to
//! permissive defaults: a sqlite record store without a path is an error, not
//! a silent switch to the in-memory backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use audit_rollup_store_sqlite::SqliteStoreConfig;
use audit_rollup_store_sqlite::SqliteStoreMode;
use audit_rollup_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "audit-rollup.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "AUDIT_ROLLUP_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default busy timeout for `SQLite` connections in milliseconds.
pub(crate) const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum busy timeout for `SQLite` connections in milliseconds.
pub(crate) const MAX_STORE_BUSY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Audit rollup tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditRollupConfig {
    /// Record store configuration.
    #[serde(default)]
    pub record_store: RecordStoreConfig,
}

impl AuditRollupConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then the `AUDIT_ROLLUP_CONFIG`
    /// environment variable, then `audit-rollup.toml` in the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.record_store.validate()
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: RecordStoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            store_type: RecordStoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl RecordStoreConfig {
    /// Validates record store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            RecordStoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory record_store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            RecordStoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite record_store requires path".to_string())
                })?;
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid(
                        "record_store path must be non-empty".to_string(),
                    ));
                }
                if self.busy_timeout_ms > MAX_STORE_BUSY_TIMEOUT_MS {
                    return Err(ConfigError::Invalid(
                        "record_store busy_timeout_ms out of range".to_string(),
                    ));
                }
                validate_path(path)
            }
        }
    }

    /// Converts the section to an `SQLite` store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the section does not select the sqlite
    /// backend or lacks a path.
    pub fn to_sqlite_config(&self) -> Result<SqliteStoreConfig, ConfigError> {
        if self.store_type != RecordStoreType::Sqlite {
            return Err(ConfigError::Invalid(
                "record_store type must be sqlite for a durable store".to_string(),
            ));
        }
        let path = self.path.clone().ok_or_else(|| {
            ConfigError::Invalid("sqlite record_store requires path".to_string())
        })?;
        Ok(SqliteStoreConfig {
            path,
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        })
    }
}

/// Record store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
