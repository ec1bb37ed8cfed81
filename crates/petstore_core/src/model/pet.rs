//! Pet domain model.
//!
//! # Responsibility
//! - Define the persisted pet record and the partial field set used by
//!   insert/update payloads.
//! - Own the soft (data-quality) validation rules for new pets.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `name` is non-empty for every persisted pet.
//! - `weight` is never negative.
//! - `gender` only ever holds one of the three enumerated values.

use crate::contract::{GENDER_FEMALE, GENDER_MALE, GENDER_UNKNOWN};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type PetId = i64;

/// Enumerated pet gender, persisted as `0|1|2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub fn as_db(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }
}

impl TryFrom<i64> for Gender {
    type Error = InvalidGender;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            GENDER_UNKNOWN => Ok(Self::Unknown),
            GENDER_MALE => Ok(Self::Male),
            GENDER_FEMALE => Ok(Self::Female),
            other => Err(InvalidGender(other)),
        }
    }
}

impl From<Gender> for i64 {
    fn from(value: Gender) -> Self {
        value.as_db()
    }
}

/// Raw gender value outside `0|1|2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidGender(pub i64);

impl Display for InvalidGender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "gender must be 0, 1 or 2, got {}", self.0)
    }
}

impl Error for InvalidGender {}

/// Persisted pet record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: String,
    pub gender: Gender,
    pub weight: i64,
}

/// Validated insert payload. Only [`NewPet::try_from_values`] builds one
/// from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub gender: Gender,
    pub weight: i64,
}

/// Partially supplied pet fields. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PetValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Number of supplied fields.
    pub fn len(&self) -> usize {
        usize::from(self.name.is_some())
            + usize::from(self.breed.is_some())
            + usize::from(self.gender.is_some())
            + usize::from(self.weight.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Soft validation failures: the caller may fix input and retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name absent or empty on insert.
    EmptyName,
    /// Weight supplied but zero or negative on insert.
    NonPositiveWeight(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pet name cannot be empty"),
            Self::NonPositiveWeight(weight) => {
                write!(f, "pet weight must be greater than 0, got {weight}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Result of checking an insert payload.
///
/// A missing gender is not a data-quality problem, so it gets its own
/// variant and the provider escalates it to a usage error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertCheck {
    Valid(NewPet),
    Invalid(ValidationError),
    MissingGender,
}

impl NewPet {
    /// Applies insert rules in order: name, weight, gender.
    ///
    /// Absent weight defaults to 0 and absent breed to `""`.
    pub fn try_from_values(values: &PetValues) -> InsertCheck {
        let name = match values.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return InsertCheck::Invalid(ValidationError::EmptyName),
        };

        if let Some(weight) = values.weight {
            if weight <= 0 {
                return InsertCheck::Invalid(ValidationError::NonPositiveWeight(weight));
            }
        }

        let Some(gender) = values.gender else {
            return InsertCheck::MissingGender;
        };

        InsertCheck::Valid(Self {
            name,
            breed: values.breed.clone().unwrap_or_default(),
            gender,
            weight: values.weight.unwrap_or(0),
        })
    }
}
