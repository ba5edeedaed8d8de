//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

pub mod document_db;
pub mod identity;

pub use document_db::{Document, DocumentDatabase, FieldValue, Fields};
pub use identity::IdentityProvider;
