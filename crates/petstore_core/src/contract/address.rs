//! Resource addresses and the matcher that classifies them.
//!
//! # Responsibility
//! - Carry opaque resource paths between callers and the provider.
//! - Classify a path as the pets collection or one pet item.
//!
//! # Invariants
//! - Matching is exact: scheme, authority and path must all agree.
//! - Item ids are non-negative and fit in `i64`.

use super::{CONTENT_SCHEME, CURSOR_DIR_BASE_TYPE, CURSOR_ITEM_BASE_TYPE, PATH_PETS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[a-z]+)://(?P<authority>[^/]+)/(?P<path>[^/]+)(?:/(?P<id>[0-9]+))?$")
        .expect("valid address regex")
});

/// Opaque path naming either the pets collection or a single pet.
///
/// Any string can be wrapped; shape is only checked by [`AddressMatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Shape of an addressed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Every pet row.
    Collection,
    /// Exactly one pet row, by id.
    Item,
}

impl ResourceKind {
    /// Resource type string for results of this shape under `authority`.
    pub fn type_name(self, authority: &str) -> String {
        let base = match self {
            Self::Collection => CURSOR_DIR_BASE_TYPE,
            Self::Item => CURSOR_ITEM_BASE_TYPE,
        };
        format!("{base}/{authority}/{PATH_PETS}")
    }
}

/// Outcome of a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAddress {
    Collection,
    Item(i64),
}

impl ResolvedAddress {
    pub fn kind(self) -> ResourceKind {
        match self {
            Self::Collection => ResourceKind::Collection,
            Self::Item(_) => ResourceKind::Item,
        }
    }

    pub fn item_id(self) -> Option<i64> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(id),
        }
    }
}

/// Matches addresses against the pets resource tree of one authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMatcher {
    authority: String,
}

impl AddressMatcher {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }

    /// Address of the whole collection.
    pub fn collection(&self) -> Address {
        Address(format!("{CONTENT_SCHEME}://{}/{PATH_PETS}", self.authority))
    }

    /// Address of one pet.
    pub fn item(&self, id: i64) -> Address {
        Address(format!(
            "{CONTENT_SCHEME}://{}/{PATH_PETS}/{id}",
            self.authority
        ))
    }

    /// Classifies `address`, or returns `None` when no shape matches.
    pub fn resolve(&self, address: &Address) -> Option<ResolvedAddress> {
        let captures = ADDRESS_RE.captures(address.as_str())?;
        if &captures["scheme"] != CONTENT_SCHEME
            || &captures["authority"] != self.authority.as_str()
            || &captures["path"] != PATH_PETS
        {
            return None;
        }

        match captures.name("id") {
            None => Some(ResolvedAddress::Collection),
            Some(id) => id.as_str().parse::<i64>().ok().map(ResolvedAddress::Item),
        }
    }
}
