//! TOML Configuration File Support
//!
//! Configuration for UICP surfaces, loaded from a TOML file at
//! `~/.config/uicp/uicp.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/uicp/uicp.toml` (typically `~/.config/uicp/uicp.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [registry]
//! definitions_path = "/etc/uicp/definitions.json"
//!
//! [stream]
//! max_buffer_bytes = 1048576
//!
//! [logging]
//! filter = "uicp_core=debug"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `UICP_DEFINITIONS` | `registry.definitions_path` |
//! | `UICP_MAX_BUFFER_BYTES` | `stream.max_buffer_bytes` |
//! | `UICP_LOG` | `logging.filter` |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{Registry, RegistryError};
use crate::stream::DEFAULT_MAX_BUFFER_BYTES;

/// Environment variable naming a definitions file
pub const ENV_DEFINITIONS: &str = "UICP_DEFINITIONS";

/// Environment variable for the message buffer limit
pub const ENV_MAX_BUFFER_BYTES: &str = "UICP_MAX_BUFFER_BYTES";

/// Environment variable for the default log filter
pub const ENV_LOG: &str = "UICP_LOG";

/// Log filter used when nothing else is configured
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Registry section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryToml {
    /// Definitions document to load instead of the built-in one
    pub definitions_path: Option<PathBuf>,
}

/// Stream section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamToml {
    /// Maximum size of one message buffer in bytes
    pub max_buffer_bytes: Option<usize>,
}

/// Logging section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingToml {
    /// Default `tracing` filter directive
    pub filter: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UicpToml {
    /// Registry configuration section
    pub registry: RegistryToml,

    /// Stream configuration section
    pub stream: StreamToml,

    /// Logging configuration section
    pub logging: LoggingToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
///
/// Use [`load_config`] to load with proper priority handling, then
/// [`ConfigOverrides::apply`] for command-line flags.
#[derive(Clone, Debug)]
pub struct UicpConfig {
    /// Definitions document; `None` means the built-in registry
    pub definitions_path: Option<PathBuf>,

    /// Maximum size of one message buffer in bytes
    pub max_buffer_bytes: usize,

    /// Default `tracing` filter directive
    pub log_filter: String,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for UicpConfig {
    fn default() -> Self {
        Self {
            definitions_path: None,
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl UicpConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check value constraints
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero buffer limit or an
    /// empty log filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_buffer_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "stream.max_buffer_bytes must be greater than 0".to_string(),
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load the registry this configuration points at
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the configured document cannot be read
    /// or is invalid.
    pub fn load_registry(&self) -> Result<Registry, RegistryError> {
        match &self.definitions_path {
            Some(path) => Registry::load(path),
            None => Registry::builtin(),
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/uicp/uicp.toml` or `~/.config/uicp/uicp.toml`
/// if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("uicp").join("uicp.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<UicpConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the resulting values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<UicpConfig, ConfigError> {
    let mut config = UicpConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: UicpToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut UicpConfig, toml: &UicpToml) {
    if let Some(ref path) = toml.registry.definitions_path {
        config.definitions_path = Some(path.clone());
    }
    if let Some(bytes) = toml.stream.max_buffer_bytes {
        config.max_buffer_bytes = bytes;
    }
    if let Some(ref filter) = toml.logging.filter {
        config.log_filter = filter.clone();
    }
}

/// Apply environment overrides, reading variables through `var`
///
/// Unparsable numeric values are ignored with a warning.
fn apply_env_config(config: &mut UicpConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(path) = var(ENV_DEFINITIONS) {
        config.definitions_path = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
    if let Some(bytes) = var(ENV_MAX_BUFFER_BYTES) {
        match bytes.parse::<usize>() {
            Ok(n) => {
                config.max_buffer_bytes = n;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(
                var = ENV_MAX_BUFFER_BYTES,
                value = %bytes,
                error = %e,
                "Ignoring invalid environment value"
            ),
        }
    }
    if let Some(filter) = var(ENV_LOG) {
        config.log_filter = filter;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Definitions path override
    pub definitions_path: Option<PathBuf>,

    /// Buffer limit override
    pub max_buffer_bytes: Option<usize>,

    /// Log filter override
    pub log_filter: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set definitions path override
    #[must_use]
    pub fn with_definitions_path(mut self, path: PathBuf) -> Self {
        self.definitions_path = Some(path);
        self
    }

    /// Set buffer limit override
    #[must_use]
    pub fn with_max_buffer_bytes(mut self, bytes: usize) -> Self {
        self.max_buffer_bytes = Some(bytes);
        self
    }

    /// Set log filter override
    #[must_use]
    pub fn with_log_filter(mut self, filter: String) -> Self {
        self.log_filter = Some(filter);
        self
    }

    /// Apply overrides to a configuration and re-validate it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is invalid.
    pub fn apply(&self, config: &mut UicpConfig) -> Result<(), ConfigError> {
        if self.definitions_path.is_some()
            || self.max_buffer_bytes.is_some()
            || self.log_filter.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref path) = self.definitions_path {
            config.definitions_path = Some(path.clone());
        }
        if let Some(bytes) = self.max_buffer_bytes {
            config.max_buffer_bytes = bytes;
        }
        if let Some(ref filter) = self.log_filter {
            config.log_filter = filter.clone();
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
