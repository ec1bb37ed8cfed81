//! Pets storage contract: table layout, gender values and resource naming.
//!
//! # Responsibility
//! - Name the single `pets` table and its columns in one place.
//! - Define the addressable resource shapes (collection and item).
//!
//! # Invariants
//! - Column identifiers here are the only SQL identifiers the store
//!   interpolates into statements; user input is always bound.
//! - `_id` is assigned by SQLite and never written by callers.

pub mod address;

pub use address::{Address, AddressMatcher, ResolvedAddress, ResourceKind};

/// Authority used when the host does not configure one.
pub const DEFAULT_AUTHORITY: &str = "com.example.android.pets";
/// Scheme prefix shared by every resource address.
pub const CONTENT_SCHEME: &str = "content";
/// Path segment of the pets collection.
pub const PATH_PETS: &str = "pets";

pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
pub const COLUMN_GENDER: &str = "gender";
pub const COLUMN_WEIGHT: &str = "weight";

pub const GENDER_UNKNOWN: i64 = 0;
pub const GENDER_MALE: i64 = 1;
pub const GENDER_FEMALE: i64 = 2;

/// Base type strings for list and single-row results.
pub const CURSOR_DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";
pub const CURSOR_ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

/// One column of the `pets` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl Column {
    /// Every column in table order.
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Name,
        Column::Breed,
        Column::Gender,
        Column::Weight,
    ];

    /// SQL identifier of this column.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Id => COLUMN_ID,
            Self::Name => COLUMN_NAME,
            Self::Breed => COLUMN_BREED,
            Self::Gender => COLUMN_GENDER,
            Self::Weight => COLUMN_WEIGHT,
        }
    }

    /// Parses a column from its SQL identifier or a lowercase alias (`id`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "_id" | "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "breed" => Some(Self::Breed),
            "gender" => Some(Self::Gender),
            "weight" => Some(Self::Weight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Column;

    #[test]
    fn column_parse_accepts_sql_names_and_id_alias() {
        assert_eq!(Column::parse("_id"), Some(Column::Id));
        assert_eq!(Column::parse(" ID "), Some(Column::Id));
        assert_eq!(Column::parse("weight"), Some(Column::Weight));
        assert_eq!(Column::parse("owner"), None);
    }

    #[test]
    fn column_sql_names_round_trip_through_parse() {
        for column in Column::ALL {
            assert_eq!(Column::parse(column.as_sql()), Some(column));
        }
    }
}
