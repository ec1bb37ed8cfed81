//! Core data-access layer for the pets store.
//! This crate is the single source of truth for pet record invariants.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DatabaseLocation, StoreConfig};
pub use contract::{Address, AddressMatcher, Column, ResolvedAddress, ResourceKind};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{Gender, InvalidGender, NewPet, Pet, PetId, PetValues, ValidationError};
pub use repo::pet_repo::{
    Filter, PetQuery, PetRepository, PetRow, PetRows, RepoError, RepoResult, SortDirection,
    SortOrder, SqlitePetRepository,
};
pub use service::error::{ProviderError, ProviderResult, UsageError};
pub use service::notify::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeObserver, ObserverId};
pub use service::pet_provider::{validate_for_insert, validate_for_update, PetProvider, UpdateCheck};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
