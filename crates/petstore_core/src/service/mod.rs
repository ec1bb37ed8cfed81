//! Provider-level services.
//!
//! # Responsibility
//! - Validate payloads and route addressed requests to the record store.
//! - Notify registered observers after confirmed mutations.
//! - Keep callers decoupled from storage details.

pub mod error;
pub mod notify;
pub mod pet_provider;
