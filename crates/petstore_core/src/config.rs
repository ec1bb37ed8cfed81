//! Store configuration.
//!
//! # Responsibility
//! - Hold the settings that address and open the pets store.
//! - Build the address matcher and database connection from those settings.
//!
//! # Invariants
//! - Built once at startup and borrowed by the provider; there is no
//!   process-wide matcher or connection helper.
//! - `authority` is non-empty and contains no `/`.

use crate::contract::{Address, AddressMatcher, DEFAULT_AUTHORITY};
use crate::db::{open_db_in_memory, open_db_with_timeout, DbResult};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATABASE_FILE: &str = "pets.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where the pets table lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseLocation {
    InMemory,
    File { path: PathBuf },
}

impl Default for DatabaseLocation {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub authority: String,
    pub database: DatabaseLocation,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            database: DatabaseLocation::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Default settings backed by an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            ..Self::default()
        }
    }

    /// Default settings backed by the database file at `path`.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseLocation::File { path: path.into() },
            ..Self::default()
        }
    }

    /// Decodes and validates a JSON config document. Missing keys take
    /// their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let authority = self.authority.trim();
        if authority.is_empty() || authority != self.authority || authority.contains('/') {
            return Err(ConfigError::InvalidAuthority(self.authority.clone()));
        }
        Ok(())
    }

    pub fn matcher(&self) -> AddressMatcher {
        AddressMatcher::new(self.authority.as_str())
    }

    pub fn collection_address(&self) -> Address {
        self.matcher().collection()
    }

    pub fn item_address(&self, id: i64) -> Address {
        self.matcher().item(id)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_database(&self) -> DbResult<Connection> {
        match &self.database {
            DatabaseLocation::InMemory => open_db_in_memory(),
            DatabaseLocation::File { path } => open_db_with_timeout(path, self.busy_timeout()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidAuthority(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::InvalidAuthority(value) => write!(f, "invalid authority `{value}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidAuthority(_) => None,
        }
    }
}
