//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract used by the provider.
//! - Isolate SQLite query details from validation and routing.
//!
//! # Invariants
//! - The repository trusts its input; payload validation happens in the
//!   provider before any write.

pub mod pet_repo;
