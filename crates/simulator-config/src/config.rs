// crates/simulator-config/src/config.rs
// ============================================================================
// Module: Simulator Configuration
// Description: Configuration loading and validation for the simulator host.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: simulator-core, simulator-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file is located through an explicit path, then the
//! `SIMULATOR_CONFIG` environment variable, then `simulator.toml` in the
//! working directory. Only the last location may be absent, in which case
//! every section takes its defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use simulator_core::AuditLevel;
use simulator_core::DEFAULT_MAX_PLAN_BYTES;
use simulator_core::PlanRunnerConfig;
use simulator_core::runtime::DEFAULT_MAX_PROGRAM_BYTES;
use simulator_store_sqlite::SqliteStoreConfig;
use simulator_store_sqlite::SqliteStoreMode;
use simulator_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "simulator.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SIMULATOR_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default `SQLite` busy timeout in milliseconds.
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Upper bound for `limits.max_plan_bytes`.
pub const MAX_PLAN_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Upper bound for `limits.max_program_bytes`.
pub const MAX_PROGRAM_BYTES_LIMIT: usize = 256 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Simulator host configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulatorConfig {
    /// State store configuration.
    #[serde(default)]
    pub state_store: StateStoreConfig,
    /// Audit event configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// File the configuration was read from, if any (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl SimulatorConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicitly named file is missing, or
    /// when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        if explicit { Self::load_file(&resolved) } else { Self::load_or_default(&resolved) }
    }

    /// Loads configuration from `path`, returning defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be loaded or
    /// fails validation.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        match fs::metadata(path) {
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            _ => Self::load_file(path),
        }
    }

    /// Loads configuration from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized, not
    /// UTF-8, unparsable, or invalid.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml(content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
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
        self.state_store.validate()?;
        self.audit.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Returns the plan runner settings derived from the limits section.
    #[must_use]
    pub const fn runner_config(&self) -> PlanRunnerConfig {
        PlanRunnerConfig {
            max_plan_bytes: self.limits.max_plan_bytes,
        }
    }
}

/// State store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StateStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StateStoreType,
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

impl Default for StateStoreConfig {
    fn default() -> Self {
        Self {
            store_type: StateStoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StateStoreConfig {
    /// Validates state store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StateStoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory state_store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            StateStoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite state_store requires path".to_string())
                })?;
                validate_path_field("state_store.path", path)?;
                if self.busy_timeout_ms == 0 {
                    return Err(ConfigError::Invalid(
                        "state_store busy_timeout_ms must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the `SQLite` store settings, or `None` for the memory backend.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match self.store_type {
            StateStoreType::Memory => None,
            StateStoreType::Sqlite => self.path.as_ref().map(|path| SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
        }
    }
}

/// State store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StateStoreType {
    /// In-memory store discarded when the process exits.
    #[default]
    Memory,
    /// `SQLite`-backed durable store.
    Sqlite,
}

/// Audit event configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Destination of audit events.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// JSON-lines file path when using the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Minimum level of recorded events.
    #[serde(default)]
    pub level: AuditLevel,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires path".to_string()))
            }
            (AuditSinkType::File, Some(path)) => validate_path_field("audit.path", path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

/// Audit sink type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

/// Input size limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum plan document size in bytes.
    #[serde(default = "default_max_plan_bytes")]
    pub max_plan_bytes: usize,
    /// Maximum program module size in bytes.
    #[serde(default = "default_max_program_bytes")]
    pub max_program_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_plan_bytes: default_max_plan_bytes(),
            max_program_bytes: default_max_program_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_plan_bytes == 0 || self.max_plan_bytes > MAX_PLAN_BYTES_LIMIT {
            return Err(ConfigError::Invalid("limits.max_plan_bytes out of range".to_string()));
        }
        if self.max_program_bytes == 0 || self.max_program_bytes > MAX_PROGRAM_BYTES_LIMIT {
            return Err(ConfigError::Invalid(
                "limits.max_program_bytes out of range".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default `SQLite` busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Returns the default plan size limit.
const fn default_max_plan_bytes() -> usize {
    DEFAULT_MAX_PLAN_BYTES
}

/// Returns the default program size limit.
const fn default_max_program_bytes() -> usize {
    DEFAULT_MAX_PROGRAM_BYTES
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

/// Resolves the config path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved config path against length limits.
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

/// Validates a configured file path against length constraints.
fn validate_path_field(field: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
