//! Process-wide configuration created once at startup.
//!
//! # Responsibility
//! - Describe where the catalog lives and how metadata lookups behave.
//! - Load from TOML and validate before any component is constructed.
//!
//! # Invariants
//! - Components receive configuration at construction; nothing reads it
//!   from global state.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// `database_path` value selecting a private in-memory catalog.
pub const IN_MEMORY_DATABASE: &str = ":memory:";
pub const DEFAULT_METADATA_ENDPOINT: &str = "https://www.googleapis.com/books/v1";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 4_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 6_000;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Where the catalog database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Memory,
    File(PathBuf),
}

/// Top-level library configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// SQLite file path, or `:memory:`.
    pub database_path: String,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External metadata lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Search API base; `/volumes?q=isbn:{isbn}` is appended.
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

/// File logging settings. Logging stays off when `dir` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: None,
        }
    }
}

impl LibraryConfig {
    /// Configuration for a file-backed catalog with default settings.
    pub fn for_database(path: impl AsRef<Path>) -> Self {
        Self {
            database_path: path.as_ref().to_string_lossy().into_owned(),
            metadata: MetadataConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Configuration for a private in-memory catalog.
    pub fn in_memory() -> Self {
        Self::for_database(IN_MEMORY_DATABASE)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database_path must not be empty".to_string(),
            ));
        }
        if self.metadata.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "metadata.endpoint must not be empty".to_string(),
            ));
        }
        if self.metadata.connect_timeout_ms == 0 || self.metadata.read_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "metadata timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn storage_location(&self) -> StorageLocation {
        if self.database_path.trim() == IN_MEMORY_DATABASE {
            StorageLocation::Memory
        } else {
            StorageLocation::File(PathBuf::from(&self.database_path))
        }
    }
}
