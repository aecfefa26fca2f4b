//! Rolodex: a data-access layer for Person records over pluggable document
//! storage.
//!
//! This crate is the primary entry point of the workspace. It carries the
//! [`Person`](person::Person) record, its schema, and the
//! [`PersonRepository`](repository::PersonRepository) operations, and
//! re-exports the store layer from the sub-crates.
//!
//! # Features
//!
//! - **Typed records** - `Person` is a plain serde struct with a declared
//!   schema the store enforces at write time
//! - **Multiple backends** - in-memory storage out of the box, MongoDB behind
//!   the `mongodb` feature
//! - **Flexible querying** - composable filters with sorting, limits, and
//!   field projection
//! - **Explicit lifecycle** - the store handle is built by the caller,
//!   injected into the repository, and shut down when done
//!
//! # Quick Start
//!
//! ```ignore
//! use rolodex::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> StoreResult<()> {
//!     // Build the backend, wrap it, inject it.
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let people = PersonRepository::new(store);
//!
//!     let john = people
//!         .create(
//!             PersonDraft::new("John Doe")
//!                 .age(25)
//!                 .favorite_foods(["Pizza", "Burger"]),
//!         )
//!         .await?;
//!
//!     let found = people.find_by_name("John Doe").await?;
//!     println!("found {} people, first id {}", found.len(), john.id);
//!
//!     // Shut the store down when done.
//!     people.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod person;
pub mod prelude;
pub mod repository;

pub use rolodex_core::{backend, collection, document, error, query, schema, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use rolodex_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use rolodex_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
