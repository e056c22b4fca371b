// crates/flight-surety-config/src/config.rs
// ============================================================================
// Module: Flight Surety Configuration
// Description: Configuration loading and validation for the surety ledger.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: flight-surety-core, flight-surety-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: the ledger never starts
//! with an owner, store, or audit sink it could not validate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use flight_surety_core::AccountId;
use flight_surety_core::DEFAULT_MIN_FUNDING;
use flight_surety_core::LedgerConfig;
use flight_surety_core::Wei;
use flight_surety_store_sqlite::SqliteStoreConfig;
use flight_surety_store_sqlite::SqliteStoreMode;
use flight_surety_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "flight-surety.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FLIGHT_SURETY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of an account identifier.
pub const MAX_ACCOUNT_ID_LENGTH: usize = 256;
/// Default identity of the app-logic component.
pub(crate) const DEFAULT_APP_ID: &str = "flight-surety-app";

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for the flight surety ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct SuretyConfig {
    /// Ledger identity and funding configuration.
    pub ledger: LedgerSection,
    /// Backing store configuration.
    #[serde(default)]
    pub store: LedgerStoreConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl SuretyConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
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
        self.ledger.validate()?;
        self.store.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the ledger configuration handed to the storage component.
    #[must_use]
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            owner: self.ledger.owner.clone(),
            min_funding: self.ledger.min_funding_wei,
        }
    }
}

// ============================================================================
// SECTION: Ledger Section
// ============================================================================

/// Ledger identity and funding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSection {
    /// Contract owner identity recorded at genesis.
    pub owner: AccountId,
    /// Identity the app-logic component presents to the storage component.
    #[serde(default = "default_app_id")]
    pub app_id: AccountId,
    /// Funding threshold in wei, written as a decimal string.
    #[serde(default = "default_min_funding")]
    pub min_funding_wei: Wei,
}

impl LedgerSection {
    /// Validates ledger identities and the funding threshold.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_account_id("ledger.owner", &self.owner)?;
        validate_account_id("ledger.app_id", &self.app_id)?;
        if self.owner == self.app_id {
            return Err(ConfigError::Invalid(
                "ledger.app_id must differ from ledger.owner".to_string(),
            ));
        }
        if self.min_funding_wei.is_zero() {
            return Err(ConfigError::Invalid(
                "ledger.min_funding_wei must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Store Config
// ============================================================================

/// Ledger store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: LedgerStoreType,
    /// `SQLite` database path (required for `sqlite`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for LedgerStoreConfig {
    fn default() -> Self {
        Self {
            store_type: LedgerStoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl LedgerStoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            LedgerStoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            LedgerStoreType::Sqlite => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| ConfigError::Invalid("sqlite store requires path".to_string()))?;
                validate_store_path(path)?;
                if self.busy_timeout_ms == 0 {
                    return Err(ConfigError::Invalid(
                        "store busy_timeout_ms must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the `SQLite` store configuration when the backend is `sqlite`.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (LedgerStoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }
}

/// Ledger store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Audit sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines, required for `file`).
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires audit.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid with the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// Append-only JSON lines file.
    File,
    /// Discard audit events.
    #[serde(rename = "none")]
    Disabled,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
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

/// Resolves the config path from CLI, the `FLIGHT_SURETY_CONFIG` value, or
/// the default name.
fn resolve_path(path: Option<&Path>, env_path: Option<String>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
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

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates store paths against security limits.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid("store path must be non-empty".to_string()));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("store path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("store path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates an account identifier field.
fn validate_account_id(field: &str, value: &AccountId) -> Result<(), ConfigError> {
    let text = value.as_str();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.trim() != text {
        return Err(ConfigError::Invalid(format!(
            "{field} must not have leading or trailing whitespace"
        )));
    }
    if text.len() > MAX_ACCOUNT_ID_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Default app-logic identity.
fn default_app_id() -> AccountId {
    AccountId::new(DEFAULT_APP_ID)
}

/// Default funding threshold.
const fn default_min_funding() -> Wei {
    DEFAULT_MIN_FUNDING
}

/// Default `SQLite` busy timeout.
pub(crate) const fn default_store_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Tests
// ============================================================================
