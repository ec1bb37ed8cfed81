//! Pet domain model.
//!
//! # Responsibility
//! - Define the canonical pet record and its insert/update payloads.
//!
//! # Invariants
//! - Every persisted pet is identified by a store-assigned `PetId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod pet;
