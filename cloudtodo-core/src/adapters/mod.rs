//! Adapter implementations (hexagonal architecture)
//!
//! Adapters implement the port traits defined in `ports/`. They handle
//! the actual I/O with external systems.
//!
//! Current adapters:
//! - `duckdb`: file-backed document database and identity provider
//! - `memory`: in-memory document database and identity provider

pub mod clock;
pub mod duckdb;
pub mod memory;
pub mod secret;

pub use self::duckdb::DuckDbStore;
pub use self::memory::{InMemoryDocumentDatabase, InMemoryIdentityProvider};
