//! Provider error taxonomy.
//!
//! - `Usage`: the caller broke the API contract; do not retry.
//! - `Validation`: input was rejected; nothing was written.
//! - `Store`: the underlying write or read failed.

use crate::contract::Address;
use crate::model::pet::ValidationError;
use crate::repo::pet_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Programmer errors that abort the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Address does not name the pets collection or a pet item.
    UnknownAddress(Address),
    /// Insert payload carries no gender.
    MissingGender,
    /// Update payload supplies an empty name.
    EmptyNameOnUpdate,
    /// Inserts are only accepted on the collection address.
    InsertNotSupported(Address),
}

impl Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAddress(address) => write!(f, "unknown pets address: {address}"),
            Self::MissingGender => write!(f, "pet requires a valid gender"),
            Self::EmptyNameOnUpdate => write!(f, "pet requires a name"),
            Self::InsertNotSupported(address) => {
                write!(f, "insertion is not supported for {address}")
            }
        }
    }
}

impl Error for UsageError {}

/// Error returned by provider operations.
#[derive(Debug)]
pub enum ProviderError {
    Usage(UsageError),
    Validation(ValidationError),
    Store(RepoError),
}

impl ProviderError {
    /// Whether the error is a contract violation rather than bad data or
    /// a store failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Usage(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<UsageError> for ProviderError {
    fn from(value: UsageError) -> Self {
        Self::Usage(value)
    }
}

impl From<ValidationError> for ProviderError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProviderError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
